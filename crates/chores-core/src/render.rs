use std::io::{self, IsTerminal, Write};

use chores_shared::{Category, DueState, SortColumn, SortState, Task, category_label};
use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

const MISSING: &str = "-";

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self {
            color: color && io::stdout().is_terminal(),
        }
    }

    #[tracing::instrument(skip(self, tasks, categories))]
    pub fn print_task_table(
        &self,
        tasks: &[Task],
        categories: &[Category],
        sort: SortState,
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_task_table(&mut out, tasks, categories, sort, today)
    }

    #[tracing::instrument(skip(self, tasks, categories))]
    pub fn print_task_cards(
        &self,
        tasks: &[Task],
        categories: &[Category],
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_task_cards(&mut out, tasks, categories, today)
    }

    pub fn write_task_table<W: Write>(
        &self,
        mut writer: W,
        tasks: &[Task],
        categories: &[Category],
        sort: SortState,
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        if tasks.is_empty() {
            writeln!(writer, "No tasks.")?;
            return Ok(());
        }

        let mut headers = vec!["ID".to_string()];
        headers.extend(
            SortColumn::ALL
                .iter()
                .map(|column| format!("{}{}", column.header(), sort.indicator(*column))),
        );

        let rows = tasks
            .iter()
            .map(|task| {
                let state = task.due_state(today);
                vec![
                    self.paint(&task.short_id(), "33"),
                    task.name.clone(),
                    task.description.clone().unwrap_or_default(),
                    task.frequency_days.to_string(),
                    date_or_missing(task.last_completed),
                    self.paint_state(state),
                    category_label(categories, task.category_id).to_string(),
                    task.completed_by
                        .clone()
                        .unwrap_or_else(|| MISSING.to_string()),
                ]
            })
            .collect();

        write_table(writer, headers, rows)
    }

    pub fn write_task_cards<W: Write>(
        &self,
        mut writer: W,
        tasks: &[Task],
        categories: &[Category],
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        if tasks.is_empty() {
            writeln!(writer, "No tasks.")?;
            return Ok(());
        }

        for (idx, task) in tasks.iter().enumerate() {
            if idx > 0 {
                writeln!(writer)?;
            }
            writeln!(
                writer,
                "{} {}",
                self.paint(&task.short_id(), "33"),
                task.name
            )?;
            if let Some(description) = &task.description {
                writeln!(writer, "  {description}")?;
            }
            writeln!(writer, "  Frequency:      every {} days", task.frequency_days)?;
            writeln!(
                writer,
                "  Last completed: {}",
                date_or_missing(task.last_completed)
            )?;
            writeln!(
                writer,
                "  Status:         {}",
                self.paint_state(task.due_state(today))
            )?;
            writeln!(
                writer,
                "  Category:       {}",
                category_label(categories, task.category_id)
            )?;
            if let Some(by) = &task.completed_by {
                writeln!(writer, "  Completed by:   {by}")?;
            }
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, task, categories))]
    pub fn print_task_info(
        &self,
        task: &Task,
        categories: &[Category],
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "id              {}", task.id)?;
        writeln!(out, "name            {}", task.name)?;
        writeln!(
            out,
            "description     {}",
            task.description.as_deref().unwrap_or(MISSING)
        )?;
        writeln!(out, "frequency       {} days", task.frequency_days)?;
        writeln!(
            out,
            "last completed  {}",
            date_or_missing(task.last_completed)
        )?;
        writeln!(
            out,
            "completed by    {}",
            task.completed_by.as_deref().unwrap_or(MISSING)
        )?;
        if task.last_completed.is_some() {
            writeln!(out, "next due        {}", task.next_due())?;
        }
        writeln!(
            out,
            "status          {}",
            self.paint_state(task.due_state(today))
        )?;
        writeln!(
            out,
            "category        {}",
            category_label(categories, task.category_id)
        )?;
        if let Some(created) = &task.created_at {
            writeln!(out, "created         {created}")?;
        }
        Ok(())
    }

    pub fn print_categories(&self, categories: &[Category], tasks: &[Task]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        let headers = vec!["ID".to_string(), "Category".to_string(), "Tasks".to_string()];
        let rows = categories
            .iter()
            .map(|category| {
                let count = tasks
                    .iter()
                    .filter(|task| task.category_id == Some(category.id))
                    .count();
                vec![
                    self.paint(&category.id.simple().to_string()[..8], "33"),
                    category.name.clone(),
                    count.to_string(),
                ]
            })
            .collect();
        write_table(&mut out, headers, rows)
    }

    fn paint_state(&self, state: DueState) -> String {
        let code = match state {
            DueState::NotCompleted => "90",
            DueState::OnTrack => "32",
            DueState::DueSoon => "33",
            DueState::AlmostDue => "38;5;214",
            DueState::Overdue => "31",
        };
        self.paint(state.label(), code)
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn date_or_missing(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for (header, width) in headers.iter().zip(&widths) {
        write!(writer, "{header:width$} ", width = *width)?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (cell, width) in row.iter().zip(&widths) {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = width.saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use chores_shared::SortDirection;
    use uuid::Uuid;

    use super::*;

    fn sample() -> (Vec<Task>, Vec<Category>) {
        let kitchen = Category {
            id: Uuid::new_v4(),
            name: "Kitchen".to_string(),
        };
        let tasks = vec![
            Task {
                id: Uuid::new_v4(),
                name: "Dishes".to_string(),
                description: Some("Load and run".to_string()),
                frequency_days: 1,
                last_completed: NaiveDate::from_ymd_opt(2026, 3, 1),
                category_id: Some(kitchen.id),
                completed_by: Some("Team".to_string()),
                created_at: None,
            },
            Task {
                id: Uuid::new_v4(),
                name: "Gutters".to_string(),
                description: None,
                frequency_days: 90,
                last_completed: None,
                category_id: None,
                completed_by: None,
                created_at: None,
            },
        ];
        (tasks, vec![kitchen])
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn table_shows_fallbacks_and_sort_indicator() {
        let (tasks, categories) = sample();
        let renderer = Renderer { color: false };
        let mut out = Vec::new();
        renderer
            .write_task_table(
                &mut out,
                &tasks,
                &categories,
                SortState::by(SortColumn::Name, SortDirection::Descending),
                today(),
            )
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains("Task ▼"));
        assert!(lines[0].contains("Completed By"));
        assert!(lines[2].contains("Overdue"));
        assert!(lines[2].contains("Kitchen"));
        assert!(lines[3].contains("Not Completed"));
        assert!(lines[3].contains("Uncategorized"));
        assert!(lines[3].trim_end().ends_with('-'));
    }

    #[test]
    fn cards_omit_absent_optional_lines() {
        let (tasks, categories) = sample();
        let renderer = Renderer { color: false };
        let mut out = Vec::new();
        renderer
            .write_task_cards(&mut out, &tasks[1..], &categories, today())
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Gutters"));
        assert!(text.contains("Last completed: -"));
        assert!(text.contains("Category:       Uncategorized"));
        assert!(!text.contains("Completed by"));
    }

    #[test]
    fn ansi_codes_do_not_count_toward_width() {
        assert_eq!(strip_ansi("\x1b[31mOverdue\x1b[0m"), "Overdue");
    }
}
