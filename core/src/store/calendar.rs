//! Calendar embed: the user-supplied frame markup shown beside the cleaning
//! checklist.

use super::history::{CALENDAR_REMOVED_MESSAGE, CALENDAR_UPDATED_MESSAGE};
use super::{StateStore, StoreError};
use crate::storage::CALENDAR_EMBED_KEY;

/// Shown when nothing has been configured: the public Japanese holiday
/// calendar, month view.
pub const DEFAULT_CALENDAR_SRC: &str = "https://calendar.google.com/calendar/embed?height=600&wkst=1&ctz=Asia%2FTokyo&showNav=1&showTitle=0&showPrint=0&showCalendars=0&mode=MONTH&hl=ja&src=amEuamFwYW5lc2UjaG9saWRheUBncm91cC52LmNhbGVuZGFyLmdvb2dsZS5jb20&color=%230B8043";

const FRAME_OPEN: &str = "<iframe";
const FRAME_CLOSE: &str = "</iframe>";

/// Check embed markup and return it trimmed.
pub fn validate_embed(markup: &str) -> Result<&str, StoreError> {
    let trimmed = markup.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidEmbed("embed code is empty".into()));
    }
    if !trimmed.contains(FRAME_OPEN) || !trimmed.contains(FRAME_CLOSE) {
        return Err(StoreError::InvalidEmbed(format!(
            "expected an {}> ... {} element",
            FRAME_OPEN, FRAME_CLOSE
        )));
    }
    Ok(trimmed)
}

/// Pull the `src` attribute out of the first frame tag in `markup`.
///
/// Handles double-quoted, single-quoted and bare attribute values.
pub fn extract_frame_src(markup: &str) -> Option<String> {
    let start = markup.find(FRAME_OPEN)?;
    let tag = &markup[start + FRAME_OPEN.len()..];
    let tag = &tag[..tag.find('>')?];

    let mut rest = tag;
    loop {
        let idx = rest.find("src")?;
        let before = rest[..idx].chars().last();
        let after = rest[idx + 3..].trim_start();
        // must be a standalone attribute name: "data-src=" does not count
        let standalone = before.map_or(true, char::is_whitespace);
        if standalone {
            if let Some(value) = after.strip_prefix('=') {
                return attribute_value(value.trim_start());
            }
        }
        rest = &rest[idx + 3..];
    }
}

fn attribute_value(raw: &str) -> Option<String> {
    match raw.chars().next()? {
        quote @ ('"' | '\'') => {
            let body = &raw[1..];
            let end = body.find(quote)?;
            Some(body[..end].to_string())
        }
        _ => {
            let end = raw.find(char::is_whitespace).unwrap_or(raw.len());
            Some(raw[..end].to_string())
        }
    }
}

impl StateStore {
    /// Stored embed markup, if any.
    pub fn calendar_embed(&self) -> Result<Option<String>, StoreError> {
        Ok(self.storage.get(CALENDAR_EMBED_KEY)?)
    }

    /// Store or remove the calendar embed.
    ///
    /// `Some(markup)` is validated first; a rejected value leaves storage and
    /// history untouched. `None` removes any stored embed.
    pub fn set_calendar_embed(&mut self, markup: Option<&str>) -> Result<(), StoreError> {
        match markup {
            Some(markup) => {
                let markup = validate_embed(markup)?;
                self.storage.set(CALENDAR_EMBED_KEY, markup)?;
                self.record_history(CALENDAR_UPDATED_MESSAGE)
            }
            None => {
                self.storage.remove(CALENDAR_EMBED_KEY)?;
                self.record_history(CALENDAR_REMOVED_MESSAGE)
            }
        }
    }

    pub fn clear_calendar_embed(&mut self) -> Result<(), StoreError> {
        self.set_calendar_embed(None)
    }

    /// The frame URL to display.
    ///
    /// With nothing stored this is [`DEFAULT_CALENDAR_SRC`]. With stored
    /// markup that carries no usable frame it is `None`, and callers should
    /// tell the user to re-enter the embed code.
    pub fn calendar_frame_src(&self) -> Result<Option<String>, StoreError> {
        match self.calendar_embed()? {
            Some(markup) => Ok(extract_frame_src(&markup)),
            None => Ok(Some(DEFAULT_CALENDAR_SRC.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStorage, MemoryStorage, UPDATE_HISTORY_KEY};
    use crate::store::fixtures::*;

    const EMBED: &str =
        r#"<iframe src="https://calendar.example/embed?id=abc" width="800"></iframe>"#;

    #[test]
    fn validate_accepts_frame_markup() {
        assert_eq!(validate_embed(&format!("  {}\n", EMBED)).unwrap(), EMBED);
    }

    #[test]
    fn validate_rejects_bad_markup() {
        for bad in ["", "   ", "<div>not a frame</div>", "<iframe src=x>", "</iframe>"] {
            assert!(
                matches!(validate_embed(bad), Err(StoreError::InvalidEmbed(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn extract_src_variants() {
        assert_eq!(
            extract_frame_src(EMBED).as_deref(),
            Some("https://calendar.example/embed?id=abc")
        );
        assert_eq!(
            extract_frame_src("<iframe width=1 src='a.html'></iframe>").as_deref(),
            Some("a.html")
        );
        assert_eq!(
            extract_frame_src("<iframe src=b.html frameborder=0></iframe>").as_deref(),
            Some("b.html")
        );
        assert_eq!(
            extract_frame_src(r#"<iframe data-src="no" src = "yes"></iframe>"#).as_deref(),
            Some("yes")
        );
        assert_eq!(extract_frame_src("<iframe></iframe>"), None);
        assert_eq!(extract_frame_src("<p>hello</p>"), None);
    }

    #[test]
    fn set_embed_stores_trimmed_and_logs() {
        let (mut store, _) = empty_store();
        store.set_calendar_embed(Some(&format!("\n{}  ", EMBED))).unwrap();
        assert_eq!(store.calendar_embed().unwrap().as_deref(), Some(EMBED));
        assert_eq!(
            store.history().latest().unwrap().message,
            CALENDAR_UPDATED_MESSAGE
        );
        assert_eq!(
            store.calendar_frame_src().unwrap().as_deref(),
            Some("https://calendar.example/embed?id=abc")
        );
    }

    #[test]
    fn stored_embed_reads_back_exactly() {
        let (mut store, _) = empty_store();
        store
            .set_calendar_embed(Some("<iframe src='x'></iframe>"))
            .unwrap();
        assert_eq!(
            store.calendar_embed().unwrap().as_deref(),
            Some("<iframe src='x'></iframe>")
        );
        assert_eq!(store.calendar_frame_src().unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn rejected_embed_changes_nothing() {
        let mut storage = MemoryStorage::new();
        storage.set(CALENDAR_EMBED_KEY, EMBED).unwrap();
        let mut store = store_with(storage, &clock());

        let err = store
            .set_calendar_embed(Some("<div>not a frame</div>"))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidEmbed(_)));
        assert_eq!(store.calendar_embed().unwrap().as_deref(), Some(EMBED));
        assert!(store.history().is_empty());
        assert!(store.storage().get(UPDATE_HISTORY_KEY).unwrap().is_none());
    }

    #[test]
    fn clear_embed_removes_and_logs() {
        let (mut store, _) = empty_store();
        store.set_calendar_embed(Some(EMBED)).unwrap();
        store.clear_calendar_embed().unwrap();
        assert!(store.calendar_embed().unwrap().is_none());
        let messages: Vec<&str> = store
            .history()
            .entries()
            .iter()
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(messages, vec![CALENDAR_REMOVED_MESSAGE, CALENDAR_UPDATED_MESSAGE]);
    }

    #[test]
    fn frame_src_defaults_when_unset() {
        let (store, _) = empty_store();
        assert_eq!(
            store.calendar_frame_src().unwrap().as_deref(),
            Some(DEFAULT_CALENDAR_SRC)
        );
    }

    #[test]
    fn frame_src_none_for_frameless_markup() {
        let mut storage = MemoryStorage::new();
        storage
            .set(CALENDAR_EMBED_KEY, "<iframe title=cal></iframe>")
            .unwrap();
        let store = store_with(storage, &clock());
        assert_eq!(store.calendar_frame_src().unwrap(), None);
    }
}
