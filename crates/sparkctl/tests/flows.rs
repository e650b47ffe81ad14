//! End-to-end flows driven through `App::update` against real backends.

use std::fs;

use spark_source::{MemoryContentApi, RemoteSource, Source, SourceKind};
use sparkctl::app::App;
use sparkctl::editing::{FieldKey, RegisterFieldKey};
use sparkctl::message::{Key, Message};
use sparkctl::state::View;
use sparkctl::task::Task;
use tempfile::tempdir;

const MANIFEST: &str = "\
version: '1.0.0'
schema_version: 1
vendors:
  - name: Acme
    file: acme.yaml
    technologies: [modbus]
  - name: Beta
    file: beta.yaml
    technologies: [lorawan]
";

const ACME: &str = "\
device_types:
  - vendor_name: Acme
    model_number: PM-1
    name: Meter One
    device_type: power_meter
    description: old text
    technology_config:
      technology: modbus
      register_definitions:
        - field:
            name: voltage
            unit: V
          address: 100
          data_type: uint16
          scale: 0.1
          offset: 0.0
";

const BETA: &str = "\
device_types:
  - vendor_name: Beta
    model_number: LW-1
    name: Sensor
    device_type: sensor
    technology_config:
      technology: lorawan
      device_class: A
";

// =============================================================================
// HARNESS
// =============================================================================

/// Run `task` and every follow-up task against `source`.
async fn run_task(app: &mut App, source: &dyn Source, mut task: Task) {
    loop {
        let message = match task {
            Task::FetchIndex => Message::IndexLoaded(source.fetch_index().await),
            Task::FetchCollection { path } => {
                let result = source.fetch_collection(&path).await;
                Message::CollectionLoaded { path, result }
            }
            Task::Publish(request) => Message::Published(source.publish(&request).await),
            Task::None | Task::Quit => return,
        };
        task = app.update(message);
    }
}

async fn boot(source: &dyn Source) -> App {
    let mut app = App::new(source.kind(), source.can_write());
    let task = app.boot();
    run_task(&mut app, source, task).await;
    app
}

async fn press(app: &mut App, source: &dyn Source, key: Key) {
    let task = app.update(Message::Key(key));
    run_task(app, source, task).await;
}

async fn type_text(app: &mut App, source: &dyn Source, text: &str) {
    for c in text.chars() {
        press(app, source, Key::Char(c)).await;
    }
}

/// Clear the open inline buffer.
async fn clear_input(app: &mut App, source: &dyn Source) {
    let len = app
        .state()
        .edit
        .as_ref()
        .map_or(0, |e| e.input().text().chars().count());
    for _ in 0..len {
        press(app, source, Key::Backspace).await;
    }
}

fn select_field(app: &mut App, key: FieldKey) {
    let index = app
        .state()
        .record_fields()
        .iter()
        .position(|f| f.key == key)
        .expect("field present");
    app.state_mut().selection.field = index;
}

fn select_register_field(app: &mut App, key: RegisterFieldKey) {
    let index = app
        .state()
        .register_fields()
        .iter()
        .position(|f| f.key == key)
        .expect("register field present");
    app.state_mut().selection.register_field = index;
}

fn status_text(app: &App) -> String {
    app.state()
        .status
        .as_ref()
        .map(|s| s.text.clone())
        .unwrap_or_default()
}

fn status_is_error(app: &App) -> bool {
    app.state().status.as_ref().is_some_and(|s| s.is_error)
}

fn local_library() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("devices")).unwrap();
    fs::write(dir.path().join("manifest.yaml"), MANIFEST).unwrap();
    fs::write(dir.path().join("devices/acme.yaml"), ACME).unwrap();
    fs::write(dir.path().join("devices/beta.yaml"), BETA).unwrap();
    dir
}

fn remote_library() -> RemoteSource<MemoryContentApi> {
    let api = MemoryContentApi::new("main");
    api.set_file("main", "manifest.yaml", MANIFEST);
    api.set_file("main", "devices/acme.yaml", ACME);
    api.set_file("main", "devices/beta.yaml", BETA);
    RemoteSource::new(api, "main")
}

/// From the vendor list, open vendor `group` and edit its first device.
async fn open_device_editor(app: &mut App, source: &dyn Source, group: usize) {
    app.state_mut().selection.group = group;
    press(app, source, Key::Enter).await;
    assert_eq!(app.state().view, View::RecordList);
    press(app, source, Key::Enter).await;
    assert_eq!(app.state().view, View::RecordDetail);
    press(app, source, Key::Char('e')).await;
    assert_eq!(app.state().view, View::RecordEdit);
}

async fn back_to_vendors(app: &mut App, source: &dyn Source) {
    while app.state().view != View::GroupList {
        press(app, source, Key::Esc).await;
    }
}

// =============================================================================
// BROWSING
// =============================================================================

#[tokio::test]
async fn test_boot_loads_manifest() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let app = boot(&source).await;

    assert_eq!(app.state().view, View::GroupList);
    assert_eq!(app.state().vendor_count(), 2);
    assert_eq!(status_text(&app), "Loaded 2 vendors");
    assert!(!app.state().is_busy());
}

#[tokio::test]
async fn test_missing_manifest_shows_error_and_retries() {
    let dir = tempdir().unwrap();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;
    assert_eq!(app.state().view, View::Error);

    press(&mut app, &source, Key::Enter).await;
    assert_eq!(app.state().view, View::GroupList);
    assert!(app.state().manifest.is_none());

    fs::write(dir.path().join("manifest.yaml"), MANIFEST).unwrap();
    press(&mut app, &source, Key::Char('r')).await;
    assert_eq!(app.state().vendor_count(), 2);
}

#[tokio::test]
async fn test_failed_vendor_fetch_keeps_browsing_possible() {
    let dir = local_library();
    fs::remove_file(dir.path().join("devices/beta.yaml")).unwrap();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;

    app.state_mut().selection.group = 1;
    press(&mut app, &source, Key::Enter).await;
    assert_eq!(app.state().view, View::Error);
    assert!(app.state().current_path.is_none());

    press(&mut app, &source, Key::Esc).await;
    app.state_mut().selection.group = 0;
    press(&mut app, &source, Key::Enter).await;
    assert_eq!(app.state().view, View::RecordList);
    assert_eq!(app.state().record_count(), 1);
}

#[tokio::test]
async fn test_second_visit_uses_loaded_file() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;

    press(&mut app, &source, Key::Enter).await;
    press(&mut app, &source, Key::Esc).await;
    // Gone from disk, still browsable from memory.
    fs::remove_file(dir.path().join("devices/acme.yaml")).unwrap();
    press(&mut app, &source, Key::Enter).await;
    assert_eq!(app.state().view, View::RecordList);
    assert_eq!(app.state().record_count(), 1);
}

#[tokio::test]
async fn test_quit_only_from_vendor_list() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;

    press(&mut app, &source, Key::Enter).await;
    assert!(matches!(
        app.update(Message::Key(Key::Char('q'))),
        Task::None
    ));
    assert_eq!(app.state().view, View::RecordList);

    press(&mut app, &source, Key::Esc).await;
    assert!(matches!(
        app.update(Message::Key(Key::Char('q'))),
        Task::Quit
    ));
}

#[tokio::test]
async fn test_keys_ignored_while_loading() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = App::new(SourceKind::Local, true);

    let task = app.boot();
    assert!(matches!(task, Task::FetchIndex));
    assert_eq!(app.state().view, View::Loading);
    assert!(matches!(app.update(Message::Key(Key::Char('q'))), Task::None));
    assert!(matches!(app.update(Message::Tick), Task::None));
    assert_eq!(app.state().spinner, 1);

    run_task(&mut app, &source, task).await;
    assert_eq!(app.state().view, View::GroupList);
}

#[tokio::test]
async fn test_second_operation_is_rejected_while_busy() {
    let mut app = App::new(SourceKind::Local, true);
    assert!(matches!(app.boot(), Task::FetchIndex));
    assert!(matches!(app.boot(), Task::None));
    assert!(status_is_error(&app));
}

// =============================================================================
// EDITING
// =============================================================================

#[tokio::test]
async fn test_inline_edit_marks_file_dirty() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;
    open_device_editor(&mut app, &source, 0).await;

    select_field(&mut app, FieldKey::Name);
    press(&mut app, &source, Key::Enter).await;
    clear_input(&mut app, &source).await;
    type_text(&mut app, &source, "  Meter Two ").await;
    press(&mut app, &source, Key::Enter).await;

    assert_eq!(status_text(&app), "Updated name");
    assert_eq!(app.state().current_device().unwrap().name, "Meter Two");
    assert!(app.state().current_is_dirty());
    assert!(app.state().edit.is_none());
}

#[tokio::test]
async fn test_invalid_choice_is_rejected_without_change() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;
    open_device_editor(&mut app, &source, 0).await;

    select_field(&mut app, FieldKey::Category);
    press(&mut app, &source, Key::Enter).await;
    clear_input(&mut app, &source).await;
    type_text(&mut app, &source, "toaster").await;
    press(&mut app, &source, Key::Enter).await;

    assert!(status_is_error(&app));
    assert_eq!(
        app.state().current_device().unwrap().device_type,
        "power_meter"
    );
    assert!(!app.state().store.has_changes());
}

#[tokio::test]
async fn test_escape_cancels_inline_edit() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;
    open_device_editor(&mut app, &source, 0).await;

    select_field(&mut app, FieldKey::Name);
    press(&mut app, &source, Key::Enter).await;
    type_text(&mut app, &source, "xyz").await;
    press(&mut app, &source, Key::Esc).await;

    assert_eq!(app.state().view, View::RecordEdit);
    assert_eq!(app.state().current_device().unwrap().name, "Meter One");
    assert!(!app.state().store.has_changes());
}

#[tokio::test]
async fn test_tab_cycles_device_class() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;
    open_device_editor(&mut app, &source, 1).await;

    select_field(&mut app, FieldKey::DeviceClass);
    press(&mut app, &source, Key::Tab).await;
    assert_eq!(app.state().current_device().unwrap().device_class(), "B");
    assert_eq!(status_text(&app), "device_class: B");
    press(&mut app, &source, Key::Tab).await;
    press(&mut app, &source, Key::Tab).await;
    assert_eq!(app.state().current_device().unwrap().device_class(), "A");
}

#[tokio::test]
async fn test_invalid_register_address_is_rejected() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;
    open_device_editor(&mut app, &source, 0).await;

    select_field(&mut app, FieldKey::Registers);
    press(&mut app, &source, Key::Enter).await;
    assert_eq!(app.state().view, View::SubListView);
    press(&mut app, &source, Key::Enter).await;
    assert_eq!(app.state().view, View::SubEntryEdit);

    select_register_field(&mut app, RegisterFieldKey::Address);
    for bad in ["-1", "abc", "70000"] {
        press(&mut app, &source, Key::Enter).await;
        clear_input(&mut app, &source).await;
        type_text(&mut app, &source, bad).await;
        press(&mut app, &source, Key::Enter).await;
        assert!(status_is_error(&app), "{bad} accepted");
    }

    assert_eq!(app.state().current_register().unwrap().address, 100);
    assert!(!app.state().store.has_changes());
}

#[tokio::test]
async fn test_register_add_then_delete() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;
    open_device_editor(&mut app, &source, 0).await;

    select_field(&mut app, FieldKey::Registers);
    press(&mut app, &source, Key::Enter).await;
    press(&mut app, &source, Key::Char('n')).await;
    assert_eq!(app.state().view, View::SubEntryEdit);
    assert_eq!(app.state().selection.register, 1);
    assert_eq!(app.state().register_count(), 2);

    press(&mut app, &source, Key::Esc).await;
    press(&mut app, &source, Key::Char('d')).await;
    press(&mut app, &source, Key::Char('d')).await;
    assert_eq!(app.state().register_count(), 0);
    assert_eq!(app.state().selection.register, 0);
    assert!(app.state().current_is_dirty());

    // Nothing left to delete.
    press(&mut app, &source, Key::Char('d')).await;
    assert_eq!(app.state().register_count(), 0);

    press(&mut app, &source, Key::Esc).await;
    assert_eq!(app.state().view, View::RecordEdit);
    assert_eq!(
        app.state().record_fields()[app.state().selection.field].key,
        FieldKey::Registers
    );
}

#[tokio::test]
async fn test_first_register_on_new_device() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;

    press(&mut app, &source, Key::Enter).await;
    press(&mut app, &source, Key::Char('n')).await;
    assert_eq!(app.state().view, View::RecordEdit);
    assert_eq!(app.state().selection.record, 1);

    select_field(&mut app, FieldKey::Registers);
    press(&mut app, &source, Key::Enter).await;
    assert_eq!(app.state().view, View::SubListView);
    assert_eq!(app.state().register_count(), 0);

    press(&mut app, &source, Key::Char('n')).await;
    assert_eq!(app.state().view, View::SubEntryEdit);
    assert_eq!(app.state().selection.register, 0);
    assert_eq!(app.state().register_count(), 1);

    press(&mut app, &source, Key::Esc).await;
    assert_eq!(app.state().view, View::SubListView);
    press(&mut app, &source, Key::Char('d')).await;
    assert_eq!(app.state().register_count(), 0);
    assert_eq!(app.state().selection.register, 0);
    assert!(app.state().current_is_dirty());
    assert!(app.state().current_device().unwrap().registers().is_empty());
    assert!(!status_is_error(&app));
}

#[tokio::test]
async fn test_registers_need_register_technology() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;
    open_device_editor(&mut app, &source, 1).await;

    app.state_mut().navigate(View::SubListView);
    press(&mut app, &source, Key::Char('n')).await;
    assert!(status_is_error(&app));
    assert!(!app.state().store.has_changes());
}

#[tokio::test]
async fn test_blob_parse_failure_keeps_section() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;
    open_device_editor(&mut app, &source, 1).await;

    select_field(&mut app, FieldKey::Section(spark_model::Section::Control));
    press(&mut app, &source, Key::Enter).await;
    assert_eq!(
        app.state().view,
        View::ConfigBlobEdit(spark_model::Section::Control)
    );
    type_text(&mut app, &source, "a: [").await;
    press(&mut app, &source, Key::Ctrl('s')).await;

    assert_eq!(app.state().view, View::RecordEdit);
    assert!(status_is_error(&app));
    assert!(!app.state().store.has_changes());
}

#[tokio::test]
async fn test_blob_save_replaces_section() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;
    open_device_editor(&mut app, &source, 1).await;

    select_field(&mut app, FieldKey::Section(spark_model::Section::Processor));
    press(&mut app, &source, Key::Enter).await;
    type_text(&mut app, &source, "decoder: js").await;
    press(&mut app, &source, Key::Ctrl('s')).await;

    assert_eq!(status_text(&app), "Saved processor_config");
    let device = app.state().current_device().unwrap();
    assert!(
        device
            .section(spark_model::Section::Processor)
            .is_some_and(|s| s.contains_key("decoder"))
    );
}

#[tokio::test]
async fn test_add_and_delete_device() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;

    press(&mut app, &source, Key::Enter).await;
    press(&mut app, &source, Key::Char('n')).await;
    assert_eq!(app.state().view, View::RecordEdit);
    assert_eq!(app.state().record_count(), 2);
    assert_eq!(app.state().selection.record, 1);
    assert_eq!(app.state().current_device().unwrap().vendor_name, "Acme");

    press(&mut app, &source, Key::Esc).await;
    press(&mut app, &source, Key::Char('d')).await;
    assert_eq!(app.state().view, View::RecordList);
    assert_eq!(app.state().record_count(), 1);
    assert_eq!(app.state().selection.record, 0);
}

#[tokio::test]
async fn test_revert_restores_original() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;

    press(&mut app, &source, Key::Enter).await;
    press(&mut app, &source, Key::Char('n')).await;
    press(&mut app, &source, Key::Esc).await;
    press(&mut app, &source, Key::Esc).await;
    assert_eq!(app.state().view, View::RecordList);
    assert_eq!(app.state().selection.record, 1);

    press(&mut app, &source, Key::Char('u')).await;
    assert_eq!(app.state().record_count(), 1);
    assert_eq!(app.state().selection.record, 0);
    assert!(!app.state().store.has_changes());

    press(&mut app, &source, Key::Char('u')).await;
    assert_eq!(status_text(&app), "No changes to revert");
}

// =============================================================================
// PUBLISHING
// =============================================================================

#[tokio::test]
async fn test_local_publish_writes_file() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;
    open_device_editor(&mut app, &source, 0).await;

    select_field(&mut app, FieldKey::Description);
    press(&mut app, &source, Key::Enter).await;
    clear_input(&mut app, &source).await;
    type_text(&mut app, &source, "new text").await;
    press(&mut app, &source, Key::Enter).await;

    back_to_vendors(&mut app, &source).await;
    press(&mut app, &source, Key::Char('p')).await;
    assert_eq!(app.state().view, View::ConfirmPublish);
    press(&mut app, &source, Key::Char('y')).await;

    assert_eq!(app.state().view, View::GroupList);
    assert_eq!(status_text(&app), "saved 1 file(s)");
    assert!(!app.state().store.has_changes());

    let written = fs::read_to_string(dir.path().join("devices/acme.yaml")).unwrap();
    assert!(written.contains("new text"));
    assert!(!written.contains("old text"));
    // Untouched vendor stays as it was.
    let beta = fs::read_to_string(dir.path().join("devices/beta.yaml")).unwrap();
    assert_eq!(beta, BETA);
}

#[tokio::test]
async fn test_publish_without_changes() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;

    press(&mut app, &source, Key::Char('p')).await;
    assert_eq!(app.state().view, View::GroupList);
    assert_eq!(status_text(&app), "No changes to publish");
}

#[tokio::test]
async fn test_cancel_publish_keeps_changes() {
    let dir = local_library();
    let source = spark_source::LocalSource::new(dir.path());
    let mut app = boot(&source).await;

    press(&mut app, &source, Key::Enter).await;
    press(&mut app, &source, Key::Char('n')).await;
    back_to_vendors(&mut app, &source).await;
    press(&mut app, &source, Key::Char('p')).await;
    press(&mut app, &source, Key::Char('n')).await;

    assert_eq!(app.state().view, View::GroupList);
    assert_eq!(app.state().store.dirty_count(), 1);
}

#[tokio::test]
async fn test_remote_publish_opens_pull_request() {
    let source = remote_library();
    let mut app = boot(&source).await;
    open_device_editor(&mut app, &source, 1).await;

    select_field(&mut app, FieldKey::Name);
    press(&mut app, &source, Key::Enter).await;
    type_text(&mut app, &source, " v2").await;
    press(&mut app, &source, Key::Enter).await;

    back_to_vendors(&mut app, &source).await;
    press(&mut app, &source, Key::Char('p')).await;
    press(&mut app, &source, Key::Enter).await;

    let prs = source.api().pull_requests();
    assert_eq!(prs.len(), 1);
    assert_eq!(prs[0].title, "Update device definitions via sparkctl");
    assert!(prs[0].body.contains("- Updated `devices/beta.yaml`"));
    assert_eq!(status_text(&app), format!("PR created: {}", prs[0].url));
    assert!(!app.state().store.has_changes());
    // Base branch is never written.
    assert_eq!(source.api().file("main", "devices/beta.yaml").unwrap(), BETA);
}

#[tokio::test]
async fn test_remote_conflict_keeps_everything_dirty() {
    let source = remote_library();
    let mut app = boot(&source).await;

    for group in [0, 1] {
        open_device_editor(&mut app, &source, group).await;
        select_field(&mut app, FieldKey::ModelNumber);
        press(&mut app, &source, Key::Enter).await;
        type_text(&mut app, &source, "-X").await;
        press(&mut app, &source, Key::Enter).await;
        back_to_vendors(&mut app, &source).await;
    }
    assert_eq!(app.state().store.dirty_count(), 2);

    // Someone else changes one file after it was fetched.
    source
        .api()
        .set_file("main", "devices/beta.yaml", "device_types: []\n");

    press(&mut app, &source, Key::Char('p')).await;
    press(&mut app, &source, Key::Char('y')).await;

    assert_eq!(app.state().view, View::Error);
    assert!(app.state().error.is_some());
    assert_eq!(app.state().store.dirty_count(), 2);
    assert!(source.api().pull_requests().is_empty());

    press(&mut app, &source, Key::Esc).await;
    assert_eq!(app.state().view, View::GroupList);
    assert_eq!(app.state().store.dirty_count(), 2);
}
