//! Closed domain enums and the task list view returned by the store.

use std::str::FromStr;

/// The two-valued partition a task is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBucket {
    Today,
    Tomorrow,
}

impl DayBucket {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
        }
    }
}

impl FromStr for DayBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(Self::Today),
            "tomorrow" => Ok(Self::Tomorrow),
            other => Err(format!("unknown day bucket '{other}'")),
        }
    }
}

/// How often a user wants to be reminded about incomplete tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReminderInterval {
    Hourly,
    TwoHourly,
    #[default]
    Off,
}

impl ReminderInterval {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "1h",
            Self::TwoHourly => "2h",
            Self::Off => "off",
        }
    }

    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }
}

impl FromStr for ReminderInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1h" => Ok(Self::Hourly),
            "2h" => Ok(Self::TwoHourly),
            "off" => Ok(Self::Off),
            other => Err(format!("unknown reminder interval '{other}'")),
        }
    }
}

/// One stored task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub text: String,
    pub done: bool,
}

/// A user's tasks partitioned by day bucket, in storage order.
#[derive(Debug, Clone, Default)]
pub struct TaskLists {
    pub today: Vec<TaskItem>,
    pub tomorrow: Vec<TaskItem>,
}

impl TaskLists {
    pub fn is_empty(&self) -> bool {
        self.today.is_empty() && self.tomorrow.is_empty()
    }

    /// Texts of not-done tasks in a bucket, in storage order.
    pub fn incomplete(&self, bucket: DayBucket) -> Vec<&str> {
        let list = match bucket {
            DayBucket::Today => &self.today,
            DayBucket::Tomorrow => &self.tomorrow,
        };
        list.iter()
            .filter(|t| !t.done)
            .map(|t| t.text.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bucket_roundtrip() {
        for bucket in [DayBucket::Today, DayBucket::Tomorrow] {
            assert_eq!(DayBucket::from_str(bucket.as_str()), Ok(bucket));
        }
        assert!(DayBucket::from_str("someday").is_err());
    }

    #[test]
    fn test_interval_roundtrip() {
        for interval in [
            ReminderInterval::Hourly,
            ReminderInterval::TwoHourly,
            ReminderInterval::Off,
        ] {
            assert_eq!(ReminderInterval::from_str(interval.as_str()), Ok(interval));
        }
        assert!(ReminderInterval::from_str("3h").is_err());
    }

    #[test]
    fn test_interval_default_is_off() {
        assert!(ReminderInterval::default().is_off());
        assert!(!ReminderInterval::Hourly.is_off());
    }

    #[test]
    fn test_incomplete_filters_done() {
        let lists = TaskLists {
            today: vec![
                TaskItem {
                    text: "a".into(),
                    done: true,
                },
                TaskItem {
                    text: "b".into(),
                    done: false,
                },
            ],
            tomorrow: vec![],
        };
        assert_eq!(lists.incomplete(DayBucket::Today), vec!["b"]);
        assert!(lists.incomplete(DayBucket::Tomorrow).is_empty());
        assert!(!lists.is_empty());
    }
}
