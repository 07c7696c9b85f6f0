//! Sample catalog written on first start

use chrono::NaiveDate;

use super::entry::{DisplayTag, Entry, EntryDraft, EntryId};

struct Sample {
    id: u64,
    title: &'static str,
    author: &'static str,
    date: (i32, u32, u32),
    description: &'static str,
    theme: &'static str,
    recurring: bool,
    tag: DisplayTag,
}

const SAMPLES: [Sample; 4] = [
    Sample {
        id: 1,
        title: "The Library That Never Ends",
        author: "luna_moon",
        date: (2024, 1, 15),
        description: "I was in a library with infinite shelves spiraling upward. Each book whispered different stories. I found one that showed my future but woke up before I could read it.",
        theme: "Mystery",
        recurring: false,
        tag: DisplayTag::Pink,
    },
    Sample {
        id: 2,
        title: "Swimming Through Clouds",
        author: "sky_dreamer",
        date: (2024, 1, 20),
        description: "Instead of water, I was swimming through cotton candy clouds. They tasted like childhood memories. Below me, cities made of light sparkled.",
        theme: "Fantasy",
        recurring: true,
        tag: DisplayTag::Lavender,
    },
    Sample {
        id: 3,
        title: "The Forest of Forgotten Things",
        author: "moss_walker",
        date: (2024, 1, 18),
        description: "Walking through a forest where trees grew from lost items - forgotten passwords, missed chances, old phone numbers. I found a tree growing from a letter I never sent.",
        theme: "Melancholy",
        recurring: false,
        tag: DisplayTag::Mint,
    },
    Sample {
        id: 4,
        title: "Tea Party With My Anxieties",
        author: "worried_heart",
        date: (2024, 1, 22),
        description: "All my anxieties sat around a table having tea. They were actually quite polite and just wanted to talk. We made peace over chamomile.",
        theme: "Cathartic",
        recurring: true,
        tag: DisplayTag::Cream,
    },
];

/// The fixed sample entries, in display order
pub fn sample_entries() -> Vec<Entry> {
    SAMPLES
        .iter()
        .map(|s| {
            let (y, m, d) = s.date;
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);
            let draft = EntryDraft::new(s.title)
                .date(date)
                .description(s.description)
                .theme(s.theme)
                .recurring(s.recurring);
            let mut entry = Entry::new(EntryId(s.id), s.author, draft);
            entry.display_tag = s.tag;
            entry
        })
        .collect()
}
