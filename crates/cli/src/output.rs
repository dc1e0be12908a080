//! Terminal output.

use platter::{
    orders::{StatusPresentation, StatusTone},
    routes::Route,
};
use platter_app::errors::Notice;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};

/// Write command output to stdout.
pub(crate) fn emit(text: &str) {
    #[expect(clippy::print_stdout, reason = "stdout is the output of a command")]
    {
        println!("{text}");
    }
}

/// Render a header row plus `rows`, with the columns in `numeric` aligned
/// right.
pub(crate) fn table<I, R>(header: &[&str], rows: I, numeric: &[usize]) -> String
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    let mut builder = Builder::default();
    builder.push_record(header.iter().copied());

    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Theme::from(Style::modern_rounded()));
    table.modify(Rows::first(), Color::BOLD);

    for &column in numeric {
        table.modify(Columns::new(column..column + 1), Alignment::right());
    }

    table.to_string()
}

/// Badge text for a status: glyph and label, colored by tone.
pub(crate) fn badge(presentation: &StatusPresentation) -> String {
    let text = format!("{} {}", presentation.icon.glyph(), presentation.label);

    paint(presentation.tone, &text)
}

/// Wrap `text` in the ANSI color of `tone`.
pub(crate) fn paint(tone: StatusTone, text: &str) -> String {
    let code = match tone {
        StatusTone::Yellow => "33",
        StatusTone::Blue => "34",
        StatusTone::Orange => "38;5;208",
        StatusTone::Green => "32",
        StatusTone::Purple => "35",
        StatusTone::Red => "31",
        StatusTone::Gray => "90",
    };

    format!("\x1b[{code}m{text}\x1b[0m")
}

/// Text for a notice, as a command error.
pub(crate) fn notice(notice: &Notice) -> String {
    match notice {
        Notice::Alert(message) | Notice::Placeholder(message) => message.clone(),
        Notice::Inline(errors) => errors
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect::<Vec<_>>()
            .join("\n"),
        Notice::Redirect(Route::Login) => {
            "Session expired or missing. Please log in with `platter login`.".to_string()
        }
        Notice::Redirect(route) => format!("Continue at {route}"),
    }
}

/// `-` for absent text.
pub(crate) fn or_dash(value: Option<&str>) -> String {
    value.filter(|value| !value.is_empty()).unwrap_or("-").to_string()
}
