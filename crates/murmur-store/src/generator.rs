/// Synthetic dataset generation.
///
/// Shapes are deterministic (count, ordering, timestamp spacing); cosmetic
/// fields such as names, snippets and unread counts come from the RNG.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use uuid::Uuid;

use murmur_types::ids;
use murmur_types::{ConversationPreview, Message, User};

const DISPLAY_NAMES: &[&str] = &[
    "Ada", "Bjorn", "Chiara", "Dmitri", "Esi", "Farah", "Goran", "Hana", "Ines", "Jonas",
    "Kemal", "Lucia", "Mateo", "Noor", "Otto", "Priya", "Quinn", "Rafael", "Sana", "Tomas",
];

const SNIPPETS: &[&str] = &[
    "Are we still on for tonight?",
    "Sent you the slides.",
    "Haha, that's amazing",
    "Can you call me when you're free?",
    "Running ten minutes late, sorry!",
    "Did you see the match yesterday?",
    "Thanks, I owe you one.",
    "Let me check and get back to you.",
    "The package arrived this morning.",
    "Good night!",
    "What time does it start?",
    "I'll bring snacks.",
];

/// Number of distinct avatar images the UI ships with.
const AVATAR_COUNT: u32 = 70;

/// Maximum unread badge on a generated preview.
const MAX_UNREAD: u32 = 5;

fn pick<R: Rng + ?Sized>(rng: &mut R, pool: &[&str]) -> String {
    pool.choose(rng).copied().unwrap_or_default().to_string()
}

fn random_user<R: Rng + ?Sized>(rng: &mut R) -> User {
    User {
        id: ids::id_from_rng(rng),
        display_name: pick(rng, DISPLAY_NAMES),
        avatar_ref: format!("avatar-{}", rng.random_range(1..=AVATAR_COUNT)),
    }
}

/// `count` conversation previews, newest first.
/// Preview `i` is `i * step` older than `now`.
pub fn generate_previews<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    now: DateTime<Utc>,
    step: Duration,
) -> Vec<ConversationPreview> {
    (0..count)
        .map(|i| ConversationPreview {
            id: ids::id_from_rng(rng),
            user: random_user(rng),
            last_message_text: pick(rng, SNIPPETS),
            timestamp: now - step * i as i32,
            unread_count: rng.random_range(0..=MAX_UNREAD),
        })
        .collect()
}

/// `count` messages of one conversation, oldest first.
///
/// Timestamps start `count * step` before `now` and advance by `step`, so the
/// newest generated message is still older than anything sent afterwards.
/// Odd indices are outgoing (sent by `local_user_id`).
pub fn generate_messages<R: Rng + ?Sized>(
    rng: &mut R,
    conversation_id: Uuid,
    local_user_id: Uuid,
    count: usize,
    now: DateTime<Utc>,
    step: Duration,
) -> Vec<Message> {
    let peer_id = ids::id_from_rng(rng);
    let start = now - step * count as i32;

    (0..count)
        .map(|i| {
            let is_outgoing = i % 2 == 1;
            Message {
                id: ids::id_from_rng(rng),
                conversation_id,
                sender_id: if is_outgoing { local_user_id } else { peer_id },
                text: pick(rng, SNIPPETS),
                timestamp: start + step * i as i32,
                is_outgoing,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn previews_get_strictly_older() {
        let mut rng = StdRng::seed_from_u64(3);
        let now = Utc::now();
        let previews = generate_previews(&mut rng, 10, now, Duration::minutes(30));

        assert_eq!(previews.len(), 10);
        assert_eq!(previews[0].timestamp, now);
        for pair in previews.windows(2) {
            assert_eq!(pair[0].timestamp - pair[1].timestamp, Duration::minutes(30));
        }
        assert!(previews.iter().all(|p| p.unread_count <= MAX_UNREAD));
    }

    #[test]
    fn messages_advance_and_alternate_sender() {
        let mut rng = StdRng::seed_from_u64(4);
        let me = Uuid::new_v4();
        let conversation = Uuid::new_v4();
        let now = Utc::now();
        let messages = generate_messages(&mut rng, conversation, me, 6, now, Duration::minutes(2));

        assert_eq!(messages.len(), 6);
        assert!(messages.last().unwrap().timestamp < now);
        for pair in messages.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::minutes(2));
        }
        for (i, m) in messages.iter().enumerate() {
            assert_eq!(m.conversation_id, conversation);
            assert_eq!(m.is_outgoing, i % 2 == 1);
            assert_eq!(m.sender_id == me, m.is_outgoing);
        }
    }

    #[test]
    fn zero_count_is_empty() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!(generate_previews(&mut rng, 0, Utc::now(), Duration::minutes(30)).is_empty());
        assert!(
            generate_messages(&mut rng, Uuid::nil(), Uuid::nil(), 0, Utc::now(), Duration::minutes(2))
                .is_empty()
        );
    }

    #[test]
    fn same_seed_same_dataset() {
        let now = Utc::now();
        let a = generate_previews(&mut StdRng::seed_from_u64(9), 5, now, Duration::minutes(30));
        let b = generate_previews(&mut StdRng::seed_from_u64(9), 5, now, Duration::minutes(30));
        assert_eq!(a, b);
    }
}
