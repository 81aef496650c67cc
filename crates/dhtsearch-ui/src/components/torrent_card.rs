//! One search result row.

use crate::app::{Route, use_i18n};
use crate::core::notify::NotificationBus;
use crate::features::torrents::{
    HealthTone, RelativeDate, detail_path, format_size, health_label, magnet_link,
};
use chrono::Utc;
use dhtsearch_api_models::TorrentSummary;
use gloo::utils::window;
use wasm_bindgen_futures::JsFuture;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct TorrentCardProps {
    pub torrent: TorrentSummary,
    pub keyword: String,
}

/// Copy a magnet link and report the outcome on the notification bus.
pub(crate) fn copy_magnet(magnet: String, success: String, failure: String) {
    yew::platform::spawn_local(async move {
        let promise = window().navigator().clipboard().write_text(&magnet);
        match JsFuture::from(promise).await {
            Ok(_) => NotificationBus::global().success(success),
            Err(err) => {
                tracing::warn!(error = ?err, "clipboard write failed");
                NotificationBus::global().error(failure);
            }
        }
    });
}

#[function_component(TorrentCard)]
pub(crate) fn torrent_card(props: &TorrentCardProps) -> Html {
    let i18n = use_i18n();
    let navigator = use_navigator();
    let torrent = &props.torrent;
    let href = detail_path(&torrent.info_hash, &props.keyword);

    let on_open = {
        let hash = torrent.info_hash.to_string();
        let keyword = props.keyword.clone();
        Callback::from(move |event: MouseEvent| {
            let Some(navigator) = navigator.clone() else {
                return;
            };
            event.prevent_default();
            let route = Route::Torrent { hash: hash.clone() };
            if let Err(err) = navigator.push_with_query(&route, &[("from", keyword.as_str())]) {
                tracing::warn!(error = %err, "failed to open torrent detail");
            }
        })
    };
    let on_copy = {
        let magnet = magnet_link(&torrent.info_hash);
        let success = i18n.t("torrent.copy_success");
        let failure = i18n.t("common.error");
        Callback::from(move |_: MouseEvent| {
            copy_magnet(magnet.clone(), success.clone(), failure.clone());
        })
    };
    let tone = HealthTone::from_score(torrent.health_score);
    let age = RelativeDate::from_timestamp(torrent.created_at.as_deref(), Utc::now());

    html! {
        <article class="torrent-card">
            <h3 class="name">
                <a href={href} onclick={on_open} title={torrent.name.clone()}>{torrent.name.clone()}</a>
            </h3>
            <div class="meta">
                <span class="size">{format_size(torrent.total_size)}</span>
                <span class="files">{format!("{} {}", torrent.file_count, i18n.t("torrent.files"))}</span>
                <span class={classes!("health", tone.as_str())}>
                    {format!("{} {}", i18n.t("torrent.health"), health_label(torrent.health_score))}
                </span>
                <span class="date">{age.label(&i18n.resolver)}</span>
                if torrent.has_video {
                    <span class="badge">{i18n.t("search.filters.video")}</span>
                }
                if torrent.has_audio {
                    <span class="badge">{i18n.t("search.filters.audio")}</span>
                }
            </div>
            <button class="copy" onclick={on_copy}>{i18n.t("common.copy")}</button>
        </article>
    }
}
