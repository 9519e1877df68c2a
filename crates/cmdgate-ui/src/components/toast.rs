use cmdgate_console::{Notice, NoticeKind};
use gloo::timers::callback::Timeout;
use yew::prelude::*;
use yewdux::prelude::use_store;

use crate::app::{ConsoleCtx, ConsoleStore};

const NOTICE_TIMEOUT_MS: u32 = 5000;

#[function_component(NoticeBanner)]
pub(crate) fn notice_banner() -> Html {
    let (store, _) = use_store::<ConsoleStore>();
    let Some(ctx) = use_context::<ConsoleCtx>() else {
        return html! {};
    };
    let notice = store.state.notice.clone();

    {
        let ctx = ctx.clone();
        use_effect_with_deps(
            move |notice: &Option<Notice>| {
                let handle = notice.as_ref().map(|_| {
                    Timeout::new(NOTICE_TIMEOUT_MS, move || ctx.console.dismiss_notice())
                });
                move || drop(handle)
            },
            notice.clone(),
        );
    }

    let Some(notice) = notice else {
        return html! {};
    };
    let class = match notice.kind {
        NoticeKind::Info => "info",
        NoticeKind::Error => "error",
    };
    let on_close = Callback::from(move |_: MouseEvent| ctx.console.dismiss_notice());

    html! {
        <div class="toast-host" aria-live="polite" aria-atomic="true">
            <div class={classes!("toast", class)} role="status">
                <span>{notice.message}</span>
                <button class="ghost" aria-label="Dismiss" onclick={on_close}>{"✕"}</button>
            </div>
        </div>
    }
}
