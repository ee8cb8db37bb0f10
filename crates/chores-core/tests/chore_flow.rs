use chores_core::app::{ActionError, ChoreApp, Outcome};
use chores_core::config::StoreConfig;
use chores_core::service::ChoreService;
use chores_core::store::{MemoryStore, StoreCall, StoreError};
use chores_shared::{CategoryFilter, Category, DueState, FormError, Task};
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

const KITCHEN: &str = "c0000000-0000-4000-8000-000000000001";
const YARD: &str = "d0000000-0000-4000-8000-000000000002";

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .seed(
            "categories",
            &[
                json!({"id": KITCHEN, "name": "Kitchen"}),
                json!({"id": YARD, "name": "Yard"}),
            ],
        )
        .expect("seed categories");
    store
        .seed(
            "tasks",
            &[
                json!({"name": "Dishes", "frequency_days": 1, "category_id": KITCHEN,
                       "last_completed": "2026-03-01", "completed_by": "Nick"}),
                json!({"name": "Mow lawn", "frequency_days": 10, "category_id": YARD}),
                json!({"name": "Wipe counters", "description": "", "frequency_days": 2,
                       "category_id": KITCHEN}),
                json!({"name": "Change filters", "frequency_days": 90}),
            ],
        )
        .expect("seed tasks");
    store
}

async fn activated(store: MemoryStore) -> ChoreApp<MemoryStore> {
    let service = ChoreService::new(store, &StoreConfig::default());
    let mut app = ChoreApp::new(service, "Team");
    app.activate().await.expect("activate");
    app
}

fn task_named<'a>(app: &'a ChoreApp<MemoryStore>, name: &str) -> &'a Task {
    app.board()
        .tasks
        .iter()
        .find(|task| task.name == name)
        .expect("task present")
}

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).expect("valid date")
}

#[tokio::test]
async fn activation_loads_tasks_in_creation_order() {
    let app = activated(seeded_store()).await;
    let board = app.board();

    assert!(!board.loading);
    assert_eq!(board.categories.len(), 2);
    let names: Vec<&str> = board.tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Dishes", "Mow lawn", "Wipe counters", "Change filters"]);
    assert_eq!(task_named(&app, "Wipe counters").description, None);
}

#[tokio::test]
async fn filter_all_keeps_everything_and_category_narrows() {
    let mut app = activated(seeded_store()).await;
    assert_eq!(app.board().visible_tasks(), app.board().tasks);

    let kitchen = Uuid::parse_str(KITCHEN).expect("uuid");
    app.board_mut().filter = CategoryFilter::Category(kitchen);
    let names: Vec<String> = app
        .board()
        .visible_tasks()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Dishes", "Wipe counters"]);
}

#[tokio::test]
async fn mark_complete_stamps_date_and_label_then_reloads() {
    let mut app = activated(seeded_store()).await;
    let id = task_named(&app, "Mow lawn").id;
    app.board_mut().completed_by = "Krista".to_string();

    let outcome = app.mark_complete(id, march(10)).await.expect("complete");
    assert_eq!(outcome, Outcome::Applied);

    let task = task_named(&app, "Mow lawn");
    assert_eq!(task.last_completed, Some(march(10)));
    assert_eq!(task.completed_by.as_deref(), Some("Krista"));
    // Ten days on a ten day chore: due today, not yet overdue.
    assert_eq!(task.due_state(march(20)), DueState::AlmostDue);
    assert_ne!(task.due_state(march(20)), DueState::Overdue);
    assert_eq!(task.due_state(march(21)), DueState::Overdue);
    assert!(!app.board().is_writing(id));

    let calls = app.service().store().calls();
    assert_eq!(
        calls,
        vec![StoreCall::Update {
            collection: "tasks".to_string(),
            id,
            patch: json!({"last_completed": "2026-03-10", "completed_by": "Krista"}),
        }]
    );
}

#[tokio::test]
async fn editing_submits_an_update_then_closes_and_reloads() {
    let mut app = activated(seeded_store()).await;
    let task = task_named(&app, "Dishes").clone();

    app.board_mut().open_editor(&task);
    {
        let form = app.board_mut().editor_form_mut().expect("editor open");
        form.name = "Dishes and drying".to_string();
        form.frequency_days = "2".to_string();
    }

    let outcome = app.submit_editor().await.expect("save");
    assert_eq!(outcome, Outcome::Applied);
    assert!(app.board().editor().is_none());

    let calls = app.service().store().calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], StoreCall::Update { id, .. } if *id == task.id));

    let updated = task_named(&app, "Dishes and drying");
    assert_eq!(updated.id, task.id);
    assert_eq!(updated.frequency_days, 2);
    assert_eq!(updated.completed_by.as_deref(), Some("Nick"));
    assert_eq!(app.board().tasks.len(), 4);
}

#[tokio::test]
async fn adding_inserts_a_new_task() {
    let mut app = activated(seeded_store()).await;

    app.board_mut().toggle_new_editor();
    {
        let form = app.board_mut().editor_form_mut().expect("editor open");
        form.name = "Clean gutters".to_string();
        form.set_category_key(YARD);
    }
    app.submit_editor().await.expect("insert");

    let calls = app.service().store().calls();
    assert!(matches!(&calls[..], [StoreCall::Insert { .. }]));
    let added = task_named(&app, "Clean gutters");
    assert_eq!(added.frequency_days, 7);
    assert_eq!(added.category_id, Uuid::parse_str(YARD).ok());
    assert_eq!(app.board().tasks.last().map(|t| t.name.as_str()), Some("Clean gutters"));
}

#[tokio::test]
async fn invalid_form_never_reaches_the_store() {
    let mut app = activated(seeded_store()).await;
    app.board_mut().toggle_new_editor();
    app.board_mut()
        .editor_form_mut()
        .expect("editor open")
        .frequency_days = "0".to_string();

    let err = app.submit_editor().await.unwrap_err();
    assert!(matches!(err, ActionError::Form(FormError::MissingName)));
    assert!(app.service().store().calls().is_empty());
    assert!(app.board().editor().is_some());
}

#[tokio::test]
async fn failed_save_keeps_the_editor_open_for_retry() {
    let mut app = activated(seeded_store()).await;
    let task = task_named(&app, "Mow lawn").clone();
    app.board_mut().open_editor(&task);
    app.board_mut()
        .editor_form_mut()
        .expect("editor open")
        .name = "Mow front lawn".to_string();

    app.service().store().fail_writes(true);
    let err = app.submit_editor().await.unwrap_err();
    assert!(matches!(
        err,
        ActionError::Store(StoreError::Status { status: 503, .. })
    ));

    let editor = app.board().editor().expect("editor still open");
    assert!(!editor.busy);
    assert_eq!(editor.form.name, "Mow front lawn");
    assert!(editor.error.is_some());
    assert_eq!(task_named(&app, "Mow lawn").id, task.id);

    app.service().store().fail_writes(false);
    assert_eq!(app.submit_editor().await.expect("retry"), Outcome::Applied);
    assert_eq!(task_named(&app, "Mow front lawn").id, task.id);
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let mut app = activated(seeded_store()).await;
    let task = task_named(&app, "Change filters").clone();
    app.board_mut().open_editor(&task);

    let outcome = app
        .delete_from_editor(|form| {
            assert_eq!(form.name, "Change filters");
            false
        })
        .await
        .expect("cancel");
    assert_eq!(outcome, Outcome::Cancelled);
    assert!(app.service().store().calls().is_empty());
    assert!(app.board().editor().is_some());

    let outcome = app.delete_from_editor(|_| true).await.expect("delete");
    assert_eq!(outcome, Outcome::Applied);
    assert!(app.board().editor().is_none());
    assert!(app.board().task(task.id).is_none());
    assert_eq!(app.board().tasks.len(), 3);
}

#[tokio::test]
async fn delete_is_unavailable_for_new_tasks() {
    let mut app = activated(seeded_store()).await;
    app.board_mut().toggle_new_editor();

    let outcome = app
        .delete_from_editor(|_| panic!("should not prompt"))
        .await
        .expect("ignored");
    assert_eq!(outcome, Outcome::Ignored);
}

#[tokio::test]
async fn updates_for_vanished_tasks_are_not_found() {
    let mut app = activated(seeded_store()).await;
    let ghost = Task {
        id: Uuid::new_v4(),
        name: "Ghost".to_string(),
        description: None,
        frequency_days: 3,
        last_completed: None,
        category_id: None,
        completed_by: None,
        created_at: None,
    };
    app.board_mut().open_editor(&ghost);

    let err = app.submit_editor().await.unwrap_err();
    assert!(matches!(err, ActionError::Store(StoreError::NotFound { .. })));
    assert!(app.board().editor().is_some());
}

#[tokio::test]
async fn completing_an_unknown_task_is_rejected() {
    let mut app = activated(seeded_store()).await;
    let err = app
        .mark_complete(Uuid::new_v4(), march(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::UnknownTask(_)));
}

#[tokio::test]
async fn categories_resolve_to_labels() {
    let app = activated(seeded_store()).await;
    let filters = task_named(&app, "Change filters");
    assert_eq!(app.board().category_label(filters.category_id), "Uncategorized");
    let categories: &[Category] = &app.board().categories;
    assert!(categories.iter().any(|c| c.name == "Kitchen"));
}

#[tokio::test]
async fn find_task_reads_the_current_row() {
    let mut app = activated(seeded_store()).await;
    let id = task_named(&app, "Mow lawn").id;
    app.mark_complete(id, march(12)).await.expect("complete");

    let found = app
        .service()
        .find_task(id)
        .await
        .expect("lookup")
        .expect("task exists");
    assert_eq!(found.name, "Mow lawn");
    assert_eq!(found.last_completed, Some(march(12)));

    let missing = app.service().find_task(Uuid::new_v4()).await.expect("lookup");
    assert_eq!(missing, None);
}
