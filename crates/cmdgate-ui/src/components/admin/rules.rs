use cmdgate_api_models::RuleAction;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yewdux::prelude::use_store;

use crate::app::{ConsoleCtx, ConsoleStore};

#[function_component(RulesView)]
pub(crate) fn rules_view() -> Html {
    let (store, _) = use_store::<ConsoleStore>();
    let Some(ctx) = use_context::<ConsoleCtx>() else {
        return html! {};
    };
    let form = &store.state.rule_form;

    let on_pattern = {
        let ctx = ctx.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                ctx.console.set_rule_pattern(&input.value());
            }
        })
    };
    let on_action = {
        let ctx = ctx.clone();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<HtmlSelectElement>() {
                ctx.console.set_rule_action(RuleAction::parse(&select.value()));
            }
        })
    };
    let on_submit = Callback::from(move |event: SubmitEvent| {
        event.prevent_default();
        ctx.spawn(|console| async move { console.add_rule().await });
    });

    let selected = form.action.map_or("", RuleAction::as_str);

    html! {
        <section class="rules">
            <form class="card" onsubmit={on_submit}>
                <label class="stack">
                    <span>{"Pattern (regex)"}</span>
                    <input
                        class="mono"
                        placeholder="^rm\\s+-rf"
                        value={form.pattern.clone()}
                        oninput={on_pattern}
                    />
                </label>
                <label class="stack">
                    <span>{"Action"}</span>
                    <select onchange={on_action}>
                        <option value="" selected={selected.is_empty()}>{"Choose an action"}</option>
                        {for RuleAction::all().into_iter().map(|action| html! {
                            <option value={action.as_str()} selected={selected == action.as_str()}>
                                {action.as_str()}
                            </option>
                        })}
                    </select>
                </label>
                {form.error.as_ref().map_or_else(
                    || html! {},
                    |error| html! { <p class="error-text">{error.clone()}</p> },
                )}
                {form.confirmation.as_ref().map_or_else(
                    || html! {},
                    |message| html! { <p class="success-text">{message.clone()}</p> },
                )}
                <button class="solid" type="submit">{"Add rule"}</button>
            </form>
        </section>
    }
}
