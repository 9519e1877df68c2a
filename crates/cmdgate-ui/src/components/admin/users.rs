use cmdgate_console::views::created_key_panel;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yewdux::prelude::use_store;

use crate::app::{ConsoleCtx, ConsoleStore};

#[function_component(UsersView)]
pub(crate) fn users_view() -> Html {
    let (store, _) = use_store::<ConsoleStore>();
    let Some(ctx) = use_context::<ConsoleCtx>() else {
        return html! {};
    };
    let state = &store.state;

    let on_username = {
        let ctx = ctx.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                ctx.console.set_username_input(&input.value());
            }
        })
    };
    let on_submit = {
        let ctx = ctx.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            ctx.spawn(|console| async move { console.create_user().await });
        })
    };
    let on_dismiss = Callback::from(move |_: MouseEvent| ctx.console.dismiss_created_user());

    let created = created_key_panel(state).map_or_else(
        || html! {},
        |panel| {
            html! {
                <div class="card key-panel" role="status">
                    <p>{format!("Created {}. Their API key:", panel.username)}</p>
                    <code class="mono">{panel.key}</code>
                    <p class="warning-text">{panel.warning}</p>
                    <button class="ghost" onclick={on_dismiss}>{"Done"}</button>
                </div>
            }
        },
    );

    html! {
        <section class="users">
            <form class="card" onsubmit={on_submit}>
                <label class="stack">
                    <span>{"Username"}</span>
                    <input
                        autocomplete="off"
                        value={state.user_form.username.clone()}
                        oninput={on_username}
                    />
                </label>
                {state.user_form.error.as_ref().map_or_else(
                    || html! {},
                    |error| html! { <p class="error-text">{error.clone()}</p> },
                )}
                <button class="solid" type="submit">{"Create user"}</button>
            </form>
            {created}
        </section>
    }
}
