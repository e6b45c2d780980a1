use serde::Serialize;

use super::factors::Priority;

/// Head count per priority tag, as shown above the bulk-update list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unset: usize,
}

impl PriorityCounts {
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low + self.unset
    }
}

pub fn priority_distribution<I>(tags: I) -> PriorityCounts
where
    I: IntoIterator<Item = Option<Priority>>,
{
    tags.into_iter()
        .fold(PriorityCounts::default(), |mut counts, tag| {
            match tag {
                Some(Priority::High) => counts.high += 1,
                Some(Priority::Medium) => counts.medium += 1,
                Some(Priority::Low) => counts.low += 1,
                None => counts.unset += 1,
            }
            counts
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_counts_each_tag() {
        let tags = vec![
            Some(Priority::High),
            Some(Priority::High),
            Some(Priority::Low),
            None,
            Some(Priority::Medium),
        ];
        let counts = priority_distribution(tags);
        assert_eq!(
            counts,
            PriorityCounts {
                high: 2,
                medium: 1,
                low: 1,
                unset: 1
            }
        );
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn test_distribution_empty() {
        assert_eq!(priority_distribution(Vec::new()), PriorityCounts::default());
    }
}
