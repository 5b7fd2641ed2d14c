//! Live integration tests for optin-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/optin-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use optin_core::{Direction, Editor, PopupConfig, SectionKind};
use optin_db::{
    create_popup, delete_popup, get_popup, list_popups_by_shop, toggle_popup_active,
    update_popup, DbError,
};
use uuid::Uuid;

const SHOP: &str = "alpha.myshopify.com";
const OTHER_SHOP: &str = "beta.myshopify.com";

// ---------------------------------------------------------------------------
// Create / load
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn new_popup_loads_as_one_section_draft(pool: sqlx::PgPool) {
    let record = PopupConfig::new_record("  Spring Sale  ");
    let row = create_popup(&pool, SHOP, &record)
        .await
        .expect("create_popup failed");

    assert_eq!(row.public_id, record.id);
    assert_eq!(row.name, "Spring Sale");
    assert!(row.sections.is_none(), "new records store no sections blob");
    assert_eq!(row.views, 0);

    let fetched = get_popup(&pool, SHOP, record.id)
        .await
        .expect("get_popup failed")
        .expect("popup should exist");
    let draft = fetched.into_config();

    assert_eq!(draft.sections.len(), 1);
    assert_eq!(draft.sections[0].kind, SectionKind::Universal);
    assert_eq!(draft.sections[0].content.custom_buttons[0].text, "Join Now");
    assert_eq!(draft.discount.discount_type, "percentage");
}

#[sqlx::test(migrations = "../../migrations")]
async fn popups_are_invisible_to_other_shops(pool: sqlx::PgPool) {
    let record = PopupConfig::new_record("Scoped");
    create_popup(&pool, SHOP, &record).await.expect("create failed");

    let other = get_popup(&pool, OTHER_SHOP, record.id)
        .await
        .expect("get_popup failed");
    assert!(other.is_none());

    let err = delete_popup(&pool, OTHER_SHOP, record.id)
        .await
        .expect_err("cross-shop delete should fail");
    assert!(matches!(err, DbError::NotFound));

    let err = toggle_popup_active(&pool, OTHER_SHOP, record.id)
        .await
        .expect_err("cross-shop toggle should fail");
    assert!(matches!(err, DbError::NotFound));
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn saved_draft_round_trips_through_the_blob_columns(pool: sqlx::PgPool) {
    let record = PopupConfig::new_record("Multi");
    let row = create_popup(&pool, SHOP, &record).await.expect("create failed");

    let mut editor = Editor::new(row.into_config());
    editor.set_multi_step(true);
    let second = editor.add_section();
    editor
        .update_section_title(second, "Thanks")
        .expect("title update failed");
    editor
        .move_section(second, Direction::Up)
        .expect("move failed");
    let draft = editor.into_draft();
    draft.validate().expect("draft should validate");

    let saved = update_popup(&pool, SHOP, &draft)
        .await
        .expect("update_popup failed");
    assert!(saved.is_multi_step);
    assert!(saved.sections.is_some());

    let reloaded = get_popup(&pool, SHOP, record.id)
        .await
        .expect("get failed")
        .expect("popup should exist")
        .into_config();

    assert_eq!(reloaded.sections, draft.sections);
    assert_eq!(reloaded.sections[0].title, "Thanks");
    assert_eq!(reloaded.sections[0].order, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_of_missing_popup_is_not_found(pool: sqlx::PgPool) {
    let mut record = PopupConfig::new_record("Ghost");
    record.id = Uuid::new_v4();

    let err = update_popup(&pool, SHOP, &record)
        .await
        .expect_err("update of a missing popup should fail");
    assert!(matches!(err, DbError::NotFound));
}

// ---------------------------------------------------------------------------
// List / toggle / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn list_is_scoped_and_newest_first(pool: sqlx::PgPool) {
    let first = PopupConfig::new_record("First");
    let second = PopupConfig::new_record("Second");
    let foreign = PopupConfig::new_record("Foreign");
    create_popup(&pool, SHOP, &first).await.expect("create failed");
    create_popup(&pool, SHOP, &second).await.expect("create failed");
    create_popup(&pool, OTHER_SHOP, &foreign).await.expect("create failed");

    // Touching the first popup moves it to the top.
    toggle_popup_active(&pool, SHOP, first.id)
        .await
        .expect("toggle failed");

    let listed = list_popups_by_shop(&pool, SHOP).await.expect("list failed");
    let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn toggle_flips_is_active(pool: sqlx::PgPool) {
    let record = PopupConfig::new_record("Toggle");
    create_popup(&pool, SHOP, &record).await.expect("create failed");

    let on = toggle_popup_active(&pool, SHOP, record.id)
        .await
        .expect("toggle failed");
    assert!(on.is_active);

    let off = toggle_popup_active(&pool, SHOP, record.id)
        .await
        .expect("toggle failed");
    assert!(!off.is_active);
}

#[sqlx::test(migrations = "../../migrations")]
async fn saving_a_stale_draft_keeps_the_toggled_state(pool: sqlx::PgPool) {
    let record = PopupConfig::new_record("Stale");
    let row = create_popup(&pool, SHOP, &record).await.expect("create failed");

    // Draft loaded while the popup is inactive.
    let mut draft = row.into_config();
    assert!(!draft.is_active);

    toggle_popup_active(&pool, SHOP, record.id)
        .await
        .expect("toggle failed");

    draft.name = "Stale, renamed".to_string();
    let saved = update_popup(&pool, SHOP, &draft).await.expect("update failed");

    assert_eq!(saved.name, "Stale, renamed");
    assert!(saved.is_active, "save must not revert the toggle");
}

#[sqlx::test(migrations = "../../migrations")]
async fn delete_removes_the_row(pool: sqlx::PgPool) {
    let record = PopupConfig::new_record("Doomed");
    create_popup(&pool, SHOP, &record).await.expect("create failed");

    delete_popup(&pool, SHOP, record.id).await.expect("delete failed");

    let gone = get_popup(&pool, SHOP, record.id).await.expect("get failed");
    assert!(gone.is_none());

    let err = delete_popup(&pool, SHOP, record.id)
        .await
        .expect_err("second delete should fail");
    assert!(matches!(err, DbError::NotFound));
}
