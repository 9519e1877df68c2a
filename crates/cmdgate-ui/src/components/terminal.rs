use cmdgate_console::views::{TERMINAL_PLACEHOLDER, terminal_line};
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yewdux::prelude::use_store;

use crate::app::{ConsoleCtx, ConsoleStore};

#[function_component(TerminalView)]
pub(crate) fn terminal_view() -> Html {
    let (store, _) = use_store::<ConsoleStore>();
    let Some(ctx) = use_context::<ConsoleCtx>() else {
        return html! {};
    };
    let state = &store.state;

    let on_input = {
        let ctx = ctx.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                ctx.console.set_command_input(&input.value());
            }
        })
    };
    let on_submit = Callback::from(move |event: SubmitEvent| {
        event.prevent_default();
        ctx.spawn(|console| async move { console.submit_command().await });
    });

    let output = terminal_line(state).map_or_else(
        || html! { <p class="muted">{TERMINAL_PLACEHOLDER}</p> },
        |line| {
            html! {
                <p class={classes!("terminal-line", format!("tone-{}", line.tone))}>
                    <span class="muted">{format!("[{}] ", line.time_label)}</span>
                    <strong>{format!("{}: ", line.status_label)}</strong>
                    <span>{line.message}</span>
                </p>
            }
        },
    );

    html! {
        <section class="terminal">
            <div class="terminal-output" aria-live="polite">
                {output}
                {if state.pending_commands > 0 {
                    html! { <p class="muted">{"Running..."}</p> }
                } else {
                    html! {}
                }}
            </div>
            <form class="terminal-input" onsubmit={on_submit}>
                <span class="prompt mono">{"$"}</span>
                <input
                    class="mono"
                    placeholder="Enter a command"
                    autocomplete="off"
                    value={state.command_input.clone()}
                    oninput={on_input}
                />
                <button class="solid" type="submit">{"Run"}</button>
            </form>
        </section>
    }
}
