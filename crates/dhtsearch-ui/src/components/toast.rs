//! Toast host: the single display surface of the notification bus.
//!
//! # Design
//! - Claims the global feed on mount and hands it back on unmount.
//! - Each toast owns a `gloo` timeout; dropping the toast cancels it.

use crate::app::use_i18n;
use crate::core::notify::{self, BusSignal, Notification, NotificationBus};
use crate::core::surface::NotificationSurface;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::oneshot;
use yew::functional::UseForceUpdateHandle;
use yew::prelude::*;

type Surface = Rc<RefCell<NotificationSurface<Timeout>>>;

#[function_component(ToastHost)]
pub(crate) fn toast_host() -> Html {
    let i18n = use_i18n();
    let surface = use_mut_ref(NotificationSurface::<Timeout>::default);
    let update = use_force_update();
    {
        let surface = surface.clone();
        let update = update.clone();
        use_effect_with_deps(
            move |_| {
                let (stop, stopped) = oneshot::channel::<()>();
                match NotificationBus::global().attach() {
                    Some(mut feed) => yew::platform::spawn_local(async move {
                        let mut stopped = stopped;
                        loop {
                            tokio::select! {
                                biased;
                                _ = &mut stopped => break,
                                signal = feed.next() => match signal {
                                    Some(signal) => apply(&surface, signal, &update),
                                    None => break,
                                },
                            }
                        }
                    }),
                    None => tracing::warn!("notification surface already mounted"),
                }
                move || {
                    let _ = stop.send(());
                }
            },
            (),
        );
    }

    let visible: Vec<Notification> = surface.borrow().visible().cloned().collect();
    let dismiss_label = i18n.t("common.dismiss");
    html! {
        <div class="toast-host" aria-live="polite" aria-atomic="true">
            {for visible.iter().map(|toast| render_toast(toast, &dismiss_label))}
        </div>
    }
}

fn apply(surface: &Surface, signal: BusSignal, update: &UseForceUpdateHandle) {
    let weak = Rc::downgrade(surface);
    let on_expire = update.clone();
    let changed = surface.borrow_mut().apply(signal, move |id, delay| {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || {
            // Removing the entry drops this timeout, so leave the callback first.
            yew::platform::spawn_local(async move {
                let Some(surface) = weak.upgrade() else {
                    return;
                };
                let expired = surface.borrow_mut().expire(id);
                if expired {
                    on_expire.force_update();
                }
            });
        })
    });
    if changed {
        update.force_update();
    }
}

fn render_toast(toast: &Notification, dismiss_label: &str) -> Html {
    let id = toast.id;
    let on_close = Callback::from(move |_| notify::dismiss(id));
    html! {
        <div class={classes!("toast", toast.severity.as_str())} role="status" key={id.to_string()}>
            <span>{toast.message.clone()}</span>
            <button class="ghost" aria-label={dismiss_label.to_string()} onclick={on_close}>{"✕"}</button>
        </div>
    }
}
