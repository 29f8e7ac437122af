mod app;
mod calendar;
mod cli;
mod diary_entry;
mod editor;
mod entry_store;
mod logging;
mod navigator;
mod ui;

use app::App;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use editor::{EditorOutcome, EntryEditor};
use entry_store::EntryStore;
use navigator::MonthPicker;
use tracing::info;
use ui::{Action, UI};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = cli::Args::parse();
    let data_dir = args.resolve_data_dir();
    std::fs::create_dir_all(&data_dir)
        .wrap_err_with(|| format!("failed to create data directory {}", data_dir.display()))?;
    logging::init(args.verbose, &data_dir)?;
    info!(data_dir = %data_dir.display(), "starting");

    let mut store = EntryStore::open(data_dir.join("diary_entries.json"))
        .wrap_err("failed to open the diary store")?;
    let mut app = App::new(&store);
    let mut ui = UI::new()?;

    loop {
        ui.display(&app)?;

        if let Some(action) = ui.handle_input()? {
            app.status = None;
            match action {
                Action::Move(dx, dy) => app.move_cursor(dx, dy),
                Action::OpenDay => {
                    let mut editor = EntryEditor::open(&store, app.cursor_key());
                    match ui.run_editor(&mut editor, &mut store, &app)? {
                        EditorOutcome::Saved => app.mark_saved(),
                        EditorOutcome::Deleted => app.mark_cleared(),
                        EditorOutcome::Cancelled => {
                            if let Some(notice) = editor.notice.take() {
                                app.status = Some(notice);
                            }
                        }
                    }
                }
                Action::PickMonth => {
                    let mut picker = MonthPicker::open_at(app.selected);
                    if let Some(selected) = ui.run_picker(&mut picker, &app)? {
                        app.set_month(selected, &store);
                    }
                }
                Action::Quit => break,
            }
        }
    }

    drop(ui);
    store.close().wrap_err("failed to flush the diary store")?;
    Ok(())
}
