use std::collections::VecDeque;

/// Outcome of one bounded unit of work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobStep {
    /// More work remains; the job stays queued.
    Yield,
    /// The job finished and is dropped.
    Done,
    /// The job stopped on its own and is handed back to the caller, which
    /// decides when (or whether) to queue it again.
    Park,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobRunStats {
    pub steps: usize,
    pub finished: usize,
    pub parked: usize,
}

/// Round-robin queue of resumable jobs.
pub struct JobQueue<J> {
    queue: VecDeque<J>,
}

impl<J> Default for JobQueue<J> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl<J> JobQueue<J> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, job: J) {
        self.queue.push_back(job);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Steps queued jobs one unit at a time, rotating between them, until
    /// `budget` steps were spent or the queue is empty. Parked jobs are
    /// appended to `parked`.
    pub fn run(
        &mut self,
        budget: usize,
        parked: &mut Vec<J>,
        mut step: impl FnMut(&mut J) -> JobStep,
    ) -> JobRunStats {
        let mut stats = JobRunStats::default();
        while stats.steps < budget {
            let Some(mut job) = self.queue.pop_front() else {
                break;
            };
            stats.steps += 1;
            match step(&mut job) {
                JobStep::Yield => self.queue.push_back(job),
                JobStep::Done => stats.finished += 1,
                JobStep::Park => {
                    stats.parked += 1;
                    parked.push(job);
                }
            }
        }
        if stats.steps >= budget && !self.queue.is_empty() {
            log::trace!(
                "job budget of {} steps spent; {} job(s) carried over",
                budget,
                self.queue.len()
            );
        }
        stats
    }
}
