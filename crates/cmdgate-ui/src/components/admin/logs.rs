use cmdgate_console::views::{EMPTY_LOGS, log_rows};
use yew::prelude::*;
use yewdux::prelude::use_store;

use crate::app::{ConsoleCtx, ConsoleStore};
use crate::components::log_table;

#[function_component(LogsView)]
pub(crate) fn logs_view() -> Html {
    let (store, _) = use_store::<ConsoleStore>();
    let Some(ctx) = use_context::<ConsoleCtx>() else {
        return html! {};
    };
    let rows = log_rows(&store.state);
    let on_refresh = Callback::from(move |_: MouseEvent| {
        ctx.spawn(|console| async move { console.fetch_all_logs().await });
    });

    html! {
        <section class="audit-logs">
            <div class="actions">
                <button class="ghost" onclick={on_refresh}>{"Refresh"}</button>
            </div>
            {log_table(&rows, EMPTY_LOGS)}
        </section>
    }
}
