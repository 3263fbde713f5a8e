use agenda::calendar::{self, ViewMode};
use agenda::models::{ACCENT_COLOR, Note, NoteColor};
use agenda::store::{KeyValueStore, NOTES_KEY};
use agenda::{Agenda, AgendaOptions, NoteStore, SqliteStorage};
use chrono::{Datelike, NaiveDate};
use tempfile::TempDir;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn options() -> AgendaOptions {
    AgendaOptions {
        accent: ACCENT_COLOR,
        default_category: "Reunião".to_string(),
        view_mode: ViewMode::Month,
    }
}

fn open(dir: &TempDir, today: NaiveDate) -> Agenda {
    let path = dir.path().join("agenda.db");
    let storage = SqliteStorage::open(path.to_str().unwrap()).unwrap();
    Agenda::new(NoteStore::new(Box::new(storage)), options(), today)
}

fn add(agenda: &mut Agenda, title: &str, date: NaiveDate, category: &str, now: i64) -> i64 {
    agenda.open_create(Some(date), date);
    let draft = agenda.editor_mut().draft_mut();
    draft.title = title.to_string();
    draft.category = category.to_string();
    agenda.save_editor(now, date).unwrap().id()
}

#[test]
fn notes_survive_reopening_the_store() {
    let dir = TempDir::new().unwrap();
    let saved = {
        let mut agenda = open(&dir, d(2024, 3, 1));
        agenda.open_create(Some(d(2024, 3, 15)), d(2024, 3, 1));
        let draft = agenda.editor_mut().draft_mut();
        draft.title = "Revisão P09".to_string();
        draft.category = "Manutenção".to_string();
        draft.color = "#10b981".to_string();
        draft.description = "Trocar filtro\nVerificar óleo".to_string();
        let id = agenda.save_editor(1_710_000_000_000, d(2024, 3, 1)).unwrap().id();
        agenda.note(id).unwrap().clone()
    };

    let agenda = open(&dir, d(2024, 3, 1));
    let mut expected = Note::new(
        1_710_000_000_000,
        "Revisão P09".to_string(),
        d(2024, 3, 15),
        "Manutenção".to_string(),
    );
    expected.color = "#10b981".parse::<NoteColor>().unwrap();
    expected.description = "Trocar filtro\nVerificar óleo".to_string();
    assert_eq!(saved, expected);
    assert_eq!(agenda.notes(), &[expected][..]);
}

#[test]
fn drawer_and_grid_show_a_new_note() {
    let dir = TempDir::new().unwrap();
    let mut agenda = open(&dir, d(2024, 3, 1));
    agenda.open_drawer(d(2024, 3, 15));
    add(&mut agenda, "Revisão P09", d(2024, 3, 15), "Manutenção", 1);

    let (date, notes) = agenda.drawer().unwrap();
    assert_eq!(date, d(2024, 3, 15));
    assert_eq!(notes[0].title, "Revisão P09");

    let cells = agenda.cells(d(2024, 3, 1));
    let cell = cells.iter().find(|c| c.date == d(2024, 3, 15)).unwrap();
    assert!(cell.selected);
    assert_eq!(cell.note_count(), 1);
}

#[test]
fn month_navigation_clamps_and_rolls_over() {
    let feb = calendar::navigate(d(2024, 1, 31), ViewMode::Month, 1);
    assert_eq!(feb, d(2024, 2, 29));
    let cells = calendar::build_grid(&[], feb, ViewMode::Month, None, feb);
    let february_days = cells.iter().filter(|c| !c.other_month).count();
    assert_eq!(february_days, 29);

    let january = calendar::navigate(d(2024, 12, 10), ViewMode::Month, 1);
    assert_eq!((january.year(), january.month()), (2025, 1));
}

#[test]
fn edit_keeps_id_and_delete_removes_one() {
    let dir = TempDir::new().unwrap();
    let mut agenda = open(&dir, d(2024, 3, 1));
    let keep = add(&mut agenda, "a", d(2024, 3, 1), "Outro", 10);
    let gone = add(&mut agenda, "b", d(2024, 3, 1), "Outro", 10);
    assert_ne!(keep, gone);

    agenda.open_edit(keep).unwrap();
    agenda.editor_mut().draft_mut().date = "2024-03-20".to_string();
    let outcome = agenda.save_editor(20, d(2024, 3, 1)).unwrap();
    assert_eq!(outcome.id(), keep);

    agenda.delete(gone).unwrap();
    let reopened = open(&dir, d(2024, 3, 1));
    assert_eq!(reopened.notes().len(), 1);
    assert_eq!(reopened.notes()[0].id, keep);
    assert_eq!(reopened.notes()[0].date, d(2024, 3, 20));
}

#[test]
fn browser_export_imports_as_is() {
    let dir = TempDir::new().unwrap();
    let mut agenda = open(&dir, d(2024, 3, 1));
    let blob = r##"[
        {"id": 1710000000000, "titulo": "Revisão P09", "data": "2024-03-15",
         "cor": "#10b981", "descricao": "", "categoria": "Manutenção"},
        {"id": 1710000000001, "titulo": "Reunião", "data": "2024-03-15",
         "cor": "#6366f1", "descricao": "Sala 2", "categoria": "Reunião"}
    ]"##;
    assert_eq!(agenda.import_blob(blob).unwrap(), 2);

    let notes = agenda.notes_on(d(2024, 3, 15));
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].title, "Reunião");
    assert_eq!(notes[0].description(), Some("Sala 2"));

    let exported: serde_json::Value = serde_json::from_str(&agenda.export_blob().unwrap()).unwrap();
    assert_eq!(exported[0]["titulo"], "Revisão P09");
}

#[test]
fn garbage_blob_loads_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("agenda.db");
    {
        let mut storage = SqliteStorage::open(path.to_str().unwrap()).unwrap();
        storage.set_item(NOTES_KEY, "{not json").unwrap();
    }
    let agenda = open(&dir, d(2024, 3, 1));
    assert!(agenda.notes().is_empty());
}
