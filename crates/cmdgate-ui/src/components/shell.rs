use cmdgate_console::views::{nav_items, session_badge};
use cmdgate_console::{NavItem, NavSection, Tab};
use gloo::console;
use yew::prelude::*;
use yewdux::prelude::use_store;

use crate::app::{ConsoleCtx, ConsoleStore};

#[derive(Properties, PartialEq)]
pub(crate) struct ShellProps {
    pub(crate) children: Children,
}

#[function_component(AppShell)]
pub(crate) fn app_shell(props: &ShellProps) -> Html {
    let (store, _) = use_store::<ConsoleStore>();
    let Some(ctx) = use_context::<ConsoleCtx>() else {
        return html! {};
    };
    let state = &store.state;
    let items = nav_items(state);

    let on_select = {
        let ctx = ctx.clone();
        Callback::from(move |tab: Tab| {
            ctx.spawn(move |controller| async move {
                if let Err(err) = controller.navigate(tab).await {
                    console::warn!(err.to_string());
                }
            });
        })
    };
    let on_logout = Callback::from(move |_| ctx.console.logout());

    let badge = session_badge(state).map_or_else(
        || html! {},
        |badge| {
            html! {
                <div class="session-badge">
                    <strong>{badge.username}</strong>
                    <span class={classes!("pill", badge.admin.then_some("admin"))}>{badge.role_label}</span>
                    <span class="credits">{format!("Credits: {}", badge.credits)}</span>
                </div>
            }
        },
    );

    html! {
        <div class="app-shell">
            <aside class="sidebar">
                <div class="brand">
                    <strong>{"Command Gateway"}</strong>
                </div>
                {badge}
                <nav>
                    {nav_section(NavSection::Member, &items, &on_select)}
                    {nav_section(NavSection::Administration, &items, &on_select)}
                </nav>
                <div class="sidebar-footer">
                    <button class="ghost" onclick={on_logout}>{"Logout"}</button>
                </div>
            </aside>
            <div class="main">
                <header class="topbar">
                    <h2>{state.tab.title()}</h2>
                </header>
                <main>
                    {for props.children.iter()}
                </main>
            </div>
        </div>
    }
}

fn nav_section(section: NavSection, items: &[NavItem], on_select: &Callback<Tab>) -> Html {
    let entries: Vec<&NavItem> = items.iter().filter(|item| item.section == section).collect();
    if entries.is_empty() {
        return html! {};
    }
    html! {
        <div class="nav-section">
            <small class="muted">{section.label()}</small>
            {for entries.into_iter().map(|item| nav_item(item, on_select))}
        </div>
    }
}

fn nav_item(item: &NavItem, on_select: &Callback<Tab>) -> Html {
    let tab = item.tab;
    let onclick = on_select.reform(move |_: MouseEvent| tab);
    html! {
        <button
            class={classes!("nav-item", item.active.then_some("active"))}
            onclick={onclick}
        >
            {item.label}
        </button>
    }
}
