use std::sync::Arc;
use std::time::Duration;

use flatstore::{
    create_store_context, ContextError, EntityStore, ManualClock, StoreConfig, StoreContext,
    StoreMap,
};

#[derive(Debug, Clone, PartialEq)]
struct User {
    name: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Post {
    title: String,
    author: String,
}

struct AppStores {
    users: EntityStore<User>,
    posts: EntityStore<Post>,
}

fn app_context(clock: &ManualClock) -> Arc<StoreContext<AppStores>> {
    let clock = clock.clone();
    create_store_context(move || AppStores {
        users: EntityStore::with_clock(StoreConfig::default(), clock.clone()),
        posts: EntityStore::with_clock(StoreConfig::default(), clock.clone()),
    })
}

/// A consumer that only knows the context, not who created the stores.
fn author_names(context: &StoreContext<AppStores>) -> Result<Vec<String>, ContextError> {
    let stores = context.use_store()?;
    let names = stores
        .posts
        .collection
        .get("front-page")
        .unwrap_or_default()
        .iter()
        .filter_map(|post| post.data().map(|post| post.author.clone()))
        .map(|author| {
            stores
                .users
                .entries
                .get(&author)
                .data()
                .map(|user| user.name.clone())
                .unwrap_or_default()
        })
        .collect();
    Ok(names)
}

#[test]
fn test_access_outside_provider_fails() {
    let clock = ManualClock::new();
    let context = app_context(&clock);

    let err = author_names(&context).unwrap_err();
    assert!(matches!(err, ContextError::NoProvider));
    assert!(err.to_string().contains("use_store without StoreContext"));
}

#[test]
fn test_consumers_in_boundary_share_stores() {
    let clock = ManualClock::new();
    let context = app_context(&clock);
    let provider = context.provide();

    // Producer side
    let stores = context.use_store().unwrap();
    stores.users.entries.set(
        "u1",
        User {
            name: "Alice".into(),
        },
    );
    stores.posts.entries.set(
        "p1",
        Post {
            title: "Hello".into(),
            author: "u1".into(),
        },
    );
    clock.advance(Duration::from_millis(150));
    provider.users.run_due();
    provider.posts.run_due();
    stores.posts.collection.set("front-page", ["p1"]);

    // Consumer side
    assert_eq!(author_names(&context).unwrap(), vec!["Alice".to_string()]);

    drop(provider);
    assert!(author_names(&context).is_err());
}

#[test]
fn test_store_map_context() {
    let context = create_store_context(|| {
        StoreMap::new()
            .with("users", EntityStore::<User>::new())
            .with("posts", EntityStore::<Post>::new())
    });

    context.scope(|stores| {
        assert_eq!(stores.names().collect::<Vec<_>>(), vec!["posts", "users"]);

        let users = stores.get::<User>("users").unwrap();
        users.collection.set("admins", ["u1"]);

        let again = context.use_store().unwrap().get::<User>("users").unwrap();
        assert!(again.collection.contains("admins"));

        assert!(matches!(
            stores.get::<User>("posts"),
            Err(ContextError::StoreTypeMismatch { .. })
        ));
        assert!(matches!(
            stores.get::<User>("comments"),
            Err(ContextError::UnknownStore { .. })
        ));
    });

    assert!(context.use_store().is_err());
}
