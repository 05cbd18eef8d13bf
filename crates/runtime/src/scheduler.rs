use foundation::time::Time;

/// Delayed tasks, released by an externally driven clock.
///
/// Ordering contract: due tasks come out by `(deadline, insertion_order)`.
#[derive(Debug)]
pub struct Scheduler<T> {
    next_order: u64,
    tasks: Vec<(Time, u64, T)>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            next_order: 0,
            tasks: Vec::new(),
        }
    }

    pub fn schedule_at(&mut self, deadline: Time, task: T) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.tasks.push((deadline, order, task));
    }

    pub fn schedule_after(&mut self, now: Time, delay_ms: u64, task: T) {
        self.schedule_at(now.after_millis(delay_ms), task)
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Removes and returns every task whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: Time) -> Vec<T> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|(deadline, _, _)| *deadline <= now);
        self.tasks = rest;

        due.sort_by(|(da, oa, _), (db, ob, _)| da.0.total_cmp(&db.0).then_with(|| oa.cmp(ob)));
        due.into_iter().map(|(_, _, task)| task).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Scheduler;
    use foundation::time::Time;

    #[test]
    fn releases_only_due_tasks_in_deadline_order() {
        let mut s = Scheduler::new();
        s.schedule_after(Time::ZERO, 20, "late");
        s.schedule_after(Time::ZERO, 10, "early");
        s.schedule_after(Time::ZERO, 10, "early-2");

        assert!(s.take_due(Time::from_millis(5)).is_empty());
        assert_eq!(s.take_due(Time::from_millis(10)), vec!["early", "early-2"]);
        assert_eq!(s.pending(), 1);
        assert_eq!(s.take_due(Time::from_millis(100)), vec!["late"]);
        assert!(s.is_empty());
    }

    #[test]
    fn equal_deadlines_keep_insertion_order() {
        let mut s = Scheduler::new();
        s.schedule_at(Time::from_millis(10), 1);
        s.schedule_at(Time::from_millis(5), 2);
        s.schedule_at(Time::from_millis(10), 3);
        assert_eq!(s.take_due(Time::from_millis(10)), vec![2, 1, 3]);
    }
}
