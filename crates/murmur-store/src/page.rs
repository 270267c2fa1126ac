use std::fmt;

use serde::{Serialize, Serializer};

use murmur_types::{ConversationPreview, Message};

macro_rules! opaque_cursor {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(usize);

        impl $name {
            pub(crate) fn at(offset: usize) -> Self {
                Self(offset)
            }

            pub(crate) fn offset(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }
    };
}

opaque_cursor!(
    /// Position in a conversation list: offset of the next unread item.
    ForwardCursor
);

opaque_cursor!(
    /// Position in a message history: everything before this offset is still unrevealed.
    BackwardCursor
);

/// One window of a paginated dataset.
///
/// `next_cursor` is present exactly when `has_more` is true.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T, C> {
    items: Vec<T>,
    has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<C>,
}

pub type PreviewPage = Page<ConversationPreview, ForwardCursor>;
pub type MessagePage = Page<Message, BackwardCursor>;

impl<T, C: Copy> Page<T, C> {
    pub fn new(items: Vec<T>, next_cursor: Option<C>) -> Self {
        Self {
            items,
            has_more: next_cursor.is_some(),
            next_cursor,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn next_cursor(&self) -> Option<C> {
        self.next_cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_parts(self) -> (Vec<T>, Option<C>) {
        (self.items, self.next_cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_renders_bare_offset() {
        assert_eq!(ForwardCursor::at(20).to_string(), "20");
        assert_eq!(serde_json::to_string(&BackwardCursor::at(7)).unwrap(), "\"7\"");
    }

    #[test]
    fn has_more_tracks_cursor() {
        let open: Page<u8, ForwardCursor> = Page::new(vec![1, 2], Some(ForwardCursor::at(2)));
        assert!(open.has_more());

        let done: Page<u8, ForwardCursor> = Page::new(vec![3], None);
        assert!(!done.has_more());
        assert_eq!(done.next_cursor(), None);
    }

    #[test]
    fn last_page_omits_cursor_in_json() {
        let done: Page<u8, BackwardCursor> = Page::new(vec![], None);
        let json = serde_json::to_value(&done).unwrap();
        assert_eq!(json["has_more"], false);
        assert!(json.get("next_cursor").is_none());
    }
}
