use cmdgate_console::views::{EMPTY_HISTORY, history_rows};
use yew::prelude::*;
use yewdux::prelude::use_store;

use crate::app::{ConsoleCtx, ConsoleStore};
use crate::components::history_table;

#[function_component(HistoryView)]
pub(crate) fn history_view() -> Html {
    let (store, _) = use_store::<ConsoleStore>();
    let Some(ctx) = use_context::<ConsoleCtx>() else {
        return html! {};
    };
    let rows = history_rows(&store.state);
    let on_refresh = Callback::from(move |_: MouseEvent| {
        ctx.spawn(|console| async move { console.fetch_my_history().await });
    });

    html! {
        <section class="history">
            <div class="actions">
                <button class="ghost" onclick={on_refresh}>{"Refresh"}</button>
            </div>
            {history_table(&rows, EMPTY_HISTORY)}
        </section>
    }
}
