use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use color_eyre::eyre::WrapErr as _;
use tracing::info;

use super::{Account, AccountId, Post, PostId, Store};

/// bcrypt digests (cost 4) of the demo password `123456`
const DEMO_DIGESTS: [&str; 3] = [
    "$2b$04$wcwaquqi5ea1Ho0aKwkZ0e51/RUkg6SGxaumo8fxzILDmcrv4OBIO",
    "$2b$04$uy73IdY9HVZrIENuLwZ3k./0azDvlChLyY1ht/73N4YfEZntgChbe",
    "$2b$04$UmERaT7uP4hRqmlheiRHbOwGEhskNw05GHYucU73JRf8LgWaqWpTy",
];

struct DemoAccount {
    email: &'static str,
    name: &'static str,
    age: i32,
    height_cm: f64,
    weight_kg: f64,
    friends: &'static [u64],
}

const DEMO_ACCOUNTS: [DemoAccount; 3] = [
    DemoAccount {
        email: "fong@test.com",
        name: "Fong",
        age: 23,
        height_cm: 175.0,
        weight_kg: 70.0,
        friends: &[2, 3],
    },
    DemoAccount {
        email: "kevin@test.com",
        name: "Kevin",
        age: 40,
        height_cm: 185.0,
        weight_kg: 90.0,
        friends: &[1],
    },
    DemoAccount {
        email: "mary@test.com",
        name: "Mary",
        age: 18,
        height_cm: 162.0,
        weight_kg: 80.0,
        friends: &[1],
    },
];

/// Fills an empty store with the demo accounts and posts
pub async fn seed_demo_data(store: &Store) -> color_eyre::Result<()> {
    for (index, (demo, digest)) in DEMO_ACCOUNTS.iter().zip(DEMO_DIGESTS).enumerate() {
        let mut account = Account::new(
            AccountId(index as u64 + 1),
            Some(demo.name.to_string()),
            demo.email.to_string(),
            digest.to_string(),
        );
        account.age = Some(demo.age);
        account.height_cm = Some(demo.height_cm);
        account.weight_kg = Some(demo.weight_kg);
        account.friend_ids = demo.friends.iter().copied().map(AccountId).collect();
        store.insert_account(account).await;
    }

    let posts = [
        (1, 1, "Hello World", "This is my first post", &[1, 2][..], "2018-10-22T01:40:14.941Z"),
        (2, 2, "Nice Day", "Hello My Friend!", &[1][..], "2018-10-24T01:40:14.941Z"),
    ];
    for (id, author, title, body, likes, created_at) in posts {
        let created_at = DateTime::parse_from_rfc3339(created_at)
            .wrap_err("Demo post timestamp is not RFC 3339")?
            .with_timezone(&Utc);

        store
            .insert_post(Post {
                id: PostId(id),
                author_id: AccountId(author),
                title: title.to_string(),
                body: Some(body.to_string()),
                liked_by: likes.iter().copied().map(AccountId).collect::<BTreeSet<_>>(),
                created_at,
            })
            .await;
    }

    info!("Seeded {} demo accounts", DEMO_ACCOUNTS.len());
    Ok(())
}
