//! Chronological grouping of chats for sidebar-style display.
//!
//! Boundaries are aligned to calendar days in the time zone of `now`, not to
//! UTC. Grouping is a pure function of the chat list and `now`, so callers
//! recompute it on every read and never need a timer to notice that a day
//! boundary has passed.

use chrono::{DateTime, Duration, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::Chat;

/// One of the five fixed, mutually exclusive time ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChatBucket {
    #[serde(rename = "Today")]
    Today,
    #[serde(rename = "Yesterday")]
    Yesterday,
    #[serde(rename = "Previous 7 days")]
    Previous7Days,
    #[serde(rename = "Previous 30 days")]
    Previous30Days,
    #[serde(rename = "Older")]
    Older,
}

impl ChatBucket {
    /// All buckets in display order.
    pub fn all() -> &'static [ChatBucket] {
        &[
            ChatBucket::Today,
            ChatBucket::Yesterday,
            ChatBucket::Previous7Days,
            ChatBucket::Previous30Days,
            ChatBucket::Older,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChatBucket::Today => "Today",
            ChatBucket::Yesterday => "Yesterday",
            ChatBucket::Previous7Days => "Previous 7 days",
            ChatBucket::Previous30Days => "Previous 30 days",
            ChatBucket::Older => "Older",
        }
    }
}

/// Lower bounds of the day-aligned buckets, as UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketBoundaries {
    pub today: DateTime<Utc>,
    pub yesterday: DateTime<Utc>,
    pub week_ago: DateTime<Utc>,
    pub month_ago: DateTime<Utc>,
}

impl BucketBoundaries {
    /// Compute boundaries from the start of the calendar day containing `now`.
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let today = start_of_day(now);
        Self {
            today,
            yesterday: today - Duration::days(1),
            week_ago: today - Duration::days(7),
            month_ago: today - Duration::days(30),
        }
    }

    /// First bucket whose lower bound `updated_at` satisfies.
    pub fn classify(&self, updated_at: DateTime<Utc>) -> ChatBucket {
        if updated_at >= self.today {
            ChatBucket::Today
        } else if updated_at >= self.yesterday {
            ChatBucket::Yesterday
        } else if updated_at >= self.week_ago {
            ChatBucket::Previous7Days
        } else if updated_at >= self.month_ago {
            ChatBucket::Previous30Days
        } else {
            ChatBucket::Older
        }
    }
}

/// A non-empty bucket and its chats, in store order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatGroup<'a> {
    pub bucket: ChatBucket,
    pub chats: Vec<&'a Chat>,
}

impl ChatGroup<'_> {
    pub fn label(&self) -> &'static str {
        self.bucket.label()
    }
}

/// Partition `chats` into buckets relative to `now`, omitting empty buckets.
pub fn group_chats<'a, Tz: TimeZone>(chats: &'a [Chat], now: &DateTime<Tz>) -> Vec<ChatGroup<'a>> {
    let boundaries = BucketBoundaries::at(now);

    let mut groups: Vec<ChatGroup<'a>> = ChatBucket::all()
        .iter()
        .map(|bucket| ChatGroup {
            bucket: *bucket,
            chats: Vec::new(),
        })
        .collect();

    for chat in chats {
        let bucket = boundaries.classify(chat.updated_at);
        // `all()` is in declaration order, so the discriminant is the index.
        groups[bucket as usize].chats.push(chat);
    }

    groups.retain(|group| !group.chats.is_empty());
    groups
}

fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::default());
    match now.timezone().from_local_datetime(&midnight).earliest() {
        Some(start) => start.with_timezone(&Utc),
        // Midnight fell into a DST gap; use the current offset instead.
        None => {
            let offset = Duration::seconds(i64::from(now.offset().fix().local_minus_utc()));
            Utc.from_utc_datetime(&(midnight - offset))
        }
    }
}
