//! View components. Each reads `ConsoleStore` and calls controller operations
//! through `ConsoleCtx`.

pub(crate) mod admin;
pub(crate) mod auth;
pub(crate) mod history;
pub(crate) mod shell;
pub(crate) mod terminal;
pub(crate) mod toast;

use cmdgate_console::views::{HistoryRow, LogRow};
use yew::prelude::*;

fn tone_class(tone: &str) -> Classes {
    classes!("badge", format!("tone-{tone}"))
}

pub(crate) fn history_table(rows: &[HistoryRow], empty: &'static str) -> Html {
    if rows.is_empty() {
        return html! { <p class="muted empty">{empty}</p> };
    }
    html! {
        <table class="records">
            <thead>
                <tr><th>{"Command"}</th><th>{"Time"}</th><th>{"Action"}</th></tr>
            </thead>
            <tbody>
                {for rows.iter().map(|row| html! {
                    <tr>
                        <td class="mono">{row.command.clone()}</td>
                        <td>{row.time_label.clone()}</td>
                        <td><span class={tone_class(&row.tone)}>{row.action_label.clone()}</span></td>
                    </tr>
                })}
            </tbody>
        </table>
    }
}

pub(crate) fn log_table(rows: &[LogRow], empty: &'static str) -> Html {
    if rows.is_empty() {
        return html! { <p class="muted empty">{empty}</p> };
    }
    html! {
        <table class="records">
            <thead>
                <tr><th>{"User"}</th><th>{"Command"}</th><th>{"Action"}</th><th>{"Time"}</th></tr>
            </thead>
            <tbody>
                {for rows.iter().map(|row| html! {
                    <tr>
                        <td>{row.user.clone()}</td>
                        <td class="mono">{row.command.clone()}</td>
                        <td><span class={tone_class(&row.tone)}>{row.action_label.clone()}</span></td>
                        <td>{row.time_label.clone()}</td>
                    </tr>
                })}
            </tbody>
        </table>
    }
}
