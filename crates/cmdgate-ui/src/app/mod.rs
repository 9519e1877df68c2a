//! Application root: controller wiring and the yewdux mirror of its state.
//!
//! # Design
//! - Create exactly one controller per app boot and share it through context.
//! - The controller observer copies every state change into `ConsoleStore`;
//!   components render from the store and call controller operations.

use std::future::Future;
use std::rc::Rc;

use cmdgate_console::{ConsoleConfig, ConsoleController, ConsoleState, Screen, Tab};
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_store};
use yewdux::store::Store;

use crate::components::admin::{LogsView, RulesView, UsersView};
use crate::components::auth::LoginScreen;
use crate::components::history::HistoryView;
use crate::components::shell::AppShell;
use crate::components::terminal::TerminalView;
use crate::components::toast::NoticeBanner;
use crate::services::api::GlooGateway;
use preferences::{LocalStorageCredentials, api_base_url};

mod preferences;

pub(crate) type Console = ConsoleController<GlooGateway, LocalStorageCredentials>;

/// Render-side copy of the controller state.
#[derive(Clone, Debug, PartialEq, Default, Store)]
pub(crate) struct ConsoleStore {
    pub(crate) state: ConsoleState,
}

/// Shared controller context for components.
#[derive(Clone)]
pub(crate) struct ConsoleCtx {
    pub(crate) console: Rc<Console>,
}

impl ConsoleCtx {
    fn new(base_url: String) -> Self {
        Self {
            console: Rc::new(ConsoleController::new(
                GlooGateway::new(base_url),
                LocalStorageCredentials,
                ConsoleConfig::default(),
            )),
        }
    }

    /// Run an async controller operation on the local executor.
    pub(crate) fn spawn<F, Fut>(&self, operation: F)
    where
        F: FnOnce(Rc<Console>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let console = Rc::clone(&self.console);
        yew::platform::spawn_local(operation(console));
    }
}

impl PartialEq for ConsoleCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.console, &other.console)
    }
}

#[function_component(ConsoleApp)]
fn console_app() -> Html {
    let ctx = use_memo(|_| ConsoleCtx::new(api_base_url()), ());
    let (store, _) = use_store::<ConsoleStore>();

    {
        let ctx = (*ctx).clone();
        use_effect_with_deps(
            move |_| {
                let dispatch = Dispatch::<ConsoleStore>::new();
                ctx.console.set_observer(move |state| {
                    dispatch.set(ConsoleStore {
                        state: state.clone(),
                    });
                });
                ctx.spawn(|console| async move { console.start().await });
                || ()
            },
            (),
        );
    }

    let body = match store.state.screen() {
        Screen::Login => html! { <LoginScreen /> },
        Screen::Console(tab) => html! { <AppShell>{tab_view(tab)}</AppShell> },
    };

    html! {
        <ContextProvider<ConsoleCtx> context={(*ctx).clone()}>
            <NoticeBanner />
            {body}
        </ContextProvider<ConsoleCtx>>
    }
}

fn tab_view(tab: Tab) -> Html {
    match tab {
        Tab::Terminal => html! { <TerminalView /> },
        Tab::History => html! { <HistoryView /> },
        Tab::AdminUsers => html! { <UsersView /> },
        Tab::AdminRules => html! { <RulesView /> },
        Tab::AdminLogs => html! { <LogsView /> },
    }
}

/// Mount the console into the document body.
pub fn run_app() {
    console_error_panic_hook::set_once();
    yew::Renderer::<ConsoleApp>::new().render();
}
