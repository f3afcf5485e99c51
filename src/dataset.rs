use crate::level::Level;
use serde::{Serialize, Serializer};
use time::{Date, format_description::FormatItem, macros::format_description};

pub(crate) static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// One cell of the contribution calendar.  Padding cells have no date.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub(crate) struct ContributionDay {
    #[serde(serialize_with = "serialize_date")]
    pub(crate) date: Option<Date>,
    pub(crate) count: u32,
    pub(crate) level: Level,
}

impl ContributionDay {
    pub(crate) const PADDING: ContributionDay = ContributionDay {
        date: None,
        count: 0,
        level: Level::Idle,
    };

    pub(crate) fn new(date: Date, count: u32) -> ContributionDay {
        ContributionDay {
            date: Some(date),
            count,
            level: Level::for_count(count),
        }
    }

    pub(crate) fn is_padding(&self) -> bool {
        self.date.is_none()
    }

    /// Text shown in the status line when the cell is selected
    pub(crate) fn describe(&self) -> String {
        match self.date.and_then(|d| d.format(&YMD_FMT).ok()) {
            Some(ymd) if self.count == 1 => format!("{ymd}: 1 contribution"),
            Some(ymd) => format!("{ymd}: {} contributions", self.count),
            None => String::from("Empty slot"),
        }
    }
}

fn serialize_date<S: Serializer>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => {
            let s = d.format(&YMD_FMT).map_err(serde::ser::Error::custom)?;
            serializer.serialize_str(&s)
        }
        None => serializer.serialize_str(""),
    }
}

/// Where a dataset's numbers came from
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Origin {
    Remote,
    #[default]
    Sample,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct ContributionDataset {
    /// One entry per day of the year, in chronological order
    pub(crate) contributions: Vec<ContributionDay>,
    /// As reported by the source; not recomputed from `contributions`
    pub(crate) total_contributions: u32,
    pub(crate) origin: Origin,
}
