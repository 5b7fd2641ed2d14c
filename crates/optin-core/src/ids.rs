use chrono::Utc;

use crate::popup::PopupConfig;

/// Clock-seeded id source for sections and buttons.
///
/// Ids are epoch milliseconds, which keeps them compatible with records
/// created before this generator existed, but each id is forced strictly above
/// the previous one. Two ids minted within the same millisecond therefore
/// never collide.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start above every numeric id already present in `popup`.
    #[must_use]
    pub fn for_popup(popup: &PopupConfig) -> Self {
        let sections = popup.sections.iter().map(|s| s.id.0);
        let buttons = popup
            .sections
            .iter()
            .flat_map(|s| s.content.custom_buttons.iter())
            .chain(popup.custom_buttons.iter())
            .filter_map(|b| b.id.as_number());
        let last = sections.chain(buttons).max().unwrap_or(0);
        Self { last }
    }

    pub fn next_id(&mut self) -> i64 {
        self.next_at(Utc::now().timestamp_millis())
    }

    fn next_at(&mut self, now_millis: i64) -> i64 {
        let id = now_millis.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}
