use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, anyhow, bail};
use chores_shared::layout::TERMINAL_BREAKPOINT_COLUMNS;
use chores_shared::{
    CategoryFilter, Layout, SortDirection, SortState, Task, TaskForm, sort_tasks,
};
use tracing::{debug, info, instrument, warn};

use crate::app::{ActionError, ChoreApp, Outcome, today};
use crate::cli::{
    AddArgs, Command, EditArgs, LayoutChoice, ListArgs, resolve_category, resolve_task,
};
use crate::render::Renderer;
use crate::store::Store;

#[instrument(skip(app, renderer, command))]
pub async fn dispatch<S: Store>(
    app: &mut ChoreApp<S>,
    renderer: &Renderer,
    command: Command,
) -> anyhow::Result<()> {
    app.activate()
        .await
        .context("failed to load chores from the store")?;
    debug!(?command, "dispatching command");

    match command {
        Command::List(args) => cmd_list(app, renderer, args),
        Command::Categories => {
            let board = app.board();
            renderer.print_categories(&board.categories, &board.tasks)
        }
        Command::Complete { task, by } => cmd_complete(app, &task, by).await,
        Command::Add(args) => cmd_add(app, args).await,
        Command::Edit(args) => cmd_edit(app, args).await,
        Command::Delete { task, yes } => cmd_delete(app, &task, yes).await,
        Command::Show { task } => cmd_show(app, renderer, &task).await,
    }
}

/// Re-reads the row so `show` reflects writes made since activation.
async fn cmd_show<S: Store>(
    app: &ChoreApp<S>,
    renderer: &Renderer,
    reference: &str,
) -> anyhow::Result<()> {
    let id = resolve_task(reference, &app.board().tasks)?.id;
    let task = app
        .service()
        .find_task(id)
        .await
        .context("failed to read task")?
        .ok_or_else(|| anyhow!("task {id} no longer exists"))?;
    renderer.print_task_info(&task, &app.board().categories, today())
}

fn cmd_list<S: Store>(
    app: &mut ChoreApp<S>,
    renderer: &Renderer,
    args: ListArgs,
) -> anyhow::Result<()> {
    let filter = match args.category.as_deref() {
        None => CategoryFilter::All,
        Some(key) if key.eq_ignore_ascii_case("all") => CategoryFilter::All,
        Some(reference) => {
            let category = resolve_category(reference, &app.board().categories)?;
            CategoryFilter::Category(category.id)
        }
    };
    app.board_mut().filter = filter;

    let sort = match args.sort {
        Some(column) if args.desc => SortState::by(column, SortDirection::Descending),
        Some(column) => SortState::by(column, SortDirection::Ascending),
        None => SortState::default(),
    };

    let board = app.board();
    let tasks = sort_tasks(&board.visible_tasks(), &board.categories, sort);
    let layout = resolve_layout(args.layout);
    info!(count = tasks.len(), ?layout, filter = %filter.as_key(), "listing tasks");

    match layout {
        Layout::Table => renderer.print_task_table(&tasks, &board.categories, sort, today()),
        Layout::Cards => renderer.print_task_cards(&tasks, &board.categories, today()),
    }
}

fn resolve_layout(choice: LayoutChoice) -> Layout {
    let columns = match choice {
        LayoutChoice::Auto => terminal_columns(),
        LayoutChoice::Table | LayoutChoice::Cards => None,
    };
    layout_for(choice, columns)
}

/// Picks the list layout. `auto` without a known width falls back to the
/// table.
fn layout_for(choice: LayoutChoice, columns: Option<u16>) -> Layout {
    match choice {
        LayoutChoice::Table => Layout::Table,
        LayoutChoice::Cards => Layout::Cards,
        LayoutChoice::Auto => columns
            .map(|columns| Layout::for_width(f64::from(columns), TERMINAL_BREAKPOINT_COLUMNS))
            .unwrap_or(Layout::Table),
    }
}

/// Width of the attached terminal. `$COLUMNS` overrides the queried size.
fn terminal_columns() -> Option<u16> {
    if !io::stdout().is_terminal() {
        return None;
    }
    let from_env = std::env::var("COLUMNS")
        .ok()
        .and_then(|raw| raw.trim().parse::<u16>().ok())
        .filter(|columns| *columns > 0);
    if from_env.is_some() {
        return from_env;
    }
    match crossterm::terminal::size() {
        Ok((columns, _)) => Some(columns),
        Err(err) => {
            debug!(error = %err, "terminal size unavailable");
            None
        }
    }
}

async fn cmd_complete<S: Store>(
    app: &mut ChoreApp<S>,
    reference: &str,
    by: Option<String>,
) -> anyhow::Result<()> {
    let task = resolve_task(reference, &app.board().tasks)?.clone();
    if let Some(by) = by.filter(|by| !by.trim().is_empty()) {
        app.board_mut().completed_by = by.trim().to_string();
    }

    let date = today();
    match app.mark_complete(task.id, date).await? {
        Outcome::Applied => {
            println!(
                "Completed '{}' on {date} ({}).",
                task.name,
                app.board().completed_by
            );
            Ok(())
        }
        other => Err(anyhow!("completion of '{}' not applied: {other:?}", task.name)),
    }
}

async fn cmd_add<S: Store>(app: &mut ChoreApp<S>, args: AddArgs) -> anyhow::Result<()> {
    let category = args
        .category
        .as_deref()
        .map(|reference| resolve_category(reference, &app.board().categories).map(|c| c.id))
        .transpose()?;

    let board = app.board_mut();
    board.toggle_new_editor();
    let form = board
        .editor_form_mut()
        .ok_or_else(|| anyhow!("task editor did not open"))?;
    form.name = args.name;
    if let Some(frequency) = args.frequency {
        form.frequency_days = frequency;
    }
    if let Some(description) = args.description {
        form.description = description;
    }
    form.category_id = category;
    if let Some(raw) = args.last_completed.as_deref() {
        form.set_last_completed(raw)?;
    }
    let name = form.name.trim().to_string();

    submit(app).await?;
    println!("Added '{name}'.");
    Ok(())
}

async fn cmd_edit<S: Store>(app: &mut ChoreApp<S>, args: EditArgs) -> anyhow::Result<()> {
    let task = resolve_task(&args.task, &app.board().tasks)?.clone();
    let category = args
        .category
        .as_deref()
        .map(|reference| resolve_category(reference, &app.board().categories).map(|c| c.id))
        .transpose()?;

    let board = app.board_mut();
    if !board.open_editor(&task) {
        bail!("another save is still in flight");
    }
    let form = board
        .editor_form_mut()
        .ok_or_else(|| anyhow!("task editor did not open"))?;
    apply_edits(form, &args, category)?;

    submit(app).await?;
    println!("Saved '{}'.", task.name);
    Ok(())
}

fn apply_edits(
    form: &mut TaskForm,
    args: &EditArgs,
    category: Option<uuid::Uuid>,
) -> anyhow::Result<()> {
    if let Some(name) = &args.name {
        form.name = name.clone();
    }
    if let Some(frequency) = &args.frequency {
        form.frequency_days = frequency.clone();
    }
    if let Some(description) = &args.description {
        form.description = description.clone();
    }
    if args.clear_description {
        form.description.clear();
    }
    if category.is_some() {
        form.category_id = category;
    }
    if args.clear_category {
        form.category_id = None;
    }
    if let Some(raw) = args.last_completed.as_deref() {
        form.set_last_completed(raw)?;
    }
    if args.clear_last_completed {
        form.last_completed = None;
    }
    Ok(())
}

async fn submit<S: Store>(app: &mut ChoreApp<S>) -> anyhow::Result<()> {
    match app.submit_editor().await {
        Ok(Outcome::Applied) => Ok(()),
        Ok(other) => bail!("task was not saved: {other:?}"),
        Err(ActionError::Form(err)) => {
            app.board_mut().close_editor();
            Err(anyhow!(err).context("invalid task"))
        }
        Err(err) => Err(anyhow!(err).context("failed to save task")),
    }
}

async fn cmd_delete<S: Store>(app: &mut ChoreApp<S>, reference: &str, yes: bool) -> anyhow::Result<()> {
    let task: Task = resolve_task(reference, &app.board().tasks)?.clone();
    if !app.board_mut().open_editor(&task) {
        bail!("another save is still in flight");
    }

    let outcome = app
        .delete_from_editor(|form| yes || confirm_delete(&form.name))
        .await
        .with_context(|| format!("failed to delete '{}'", task.name))?;

    match outcome {
        Outcome::Applied => println!("Deleted '{}'.", task.name),
        Outcome::Cancelled => {
            app.board_mut().close_editor();
            println!("Kept '{}'.", task.name);
        }
        Outcome::Ignored => bail!("'{}' is busy; try again", task.name),
    }
    Ok(())
}

fn confirm_delete(name: &str) -> bool {
    let mut stdout = io::stdout().lock();
    if write!(stdout, "Are you sure you want to delete '{name}'? [y/N] ")
        .and_then(|()| stdout.flush())
        .is_err()
    {
        return false;
    }

    let mut answer = String::new();
    if let Err(err) = io::stdin().lock().read_line(&mut answer) {
        warn!(error = %err, "failed to read confirmation");
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_layout_switches_at_the_terminal_breakpoint() {
        assert_eq!(layout_for(LayoutChoice::Auto, Some(80)), Layout::Cards);
        assert_eq!(layout_for(LayoutChoice::Auto, Some(99)), Layout::Cards);
        assert_eq!(layout_for(LayoutChoice::Auto, Some(100)), Layout::Table);
        assert_eq!(layout_for(LayoutChoice::Auto, Some(180)), Layout::Table);
    }

    #[test]
    fn unknown_width_falls_back_to_table() {
        assert_eq!(layout_for(LayoutChoice::Auto, None), Layout::Table);
    }

    #[test]
    fn explicit_layout_ignores_width() {
        assert_eq!(layout_for(LayoutChoice::Cards, Some(200)), Layout::Cards);
        assert_eq!(layout_for(LayoutChoice::Table, Some(40)), Layout::Table);
    }
}
