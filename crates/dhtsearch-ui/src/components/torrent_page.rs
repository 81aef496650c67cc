//! Minimal detail view reached from a result card.

use crate::app::use_i18n;
use crate::components::search_page::RouterAddressBar;
use crate::components::torrent_card::copy_magnet;
use crate::features::search::{AddressBar, SearchRequest, query_param};
use crate::features::torrents::magnet_link;
use dhtsearch_api_models::InfoHash;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct TorrentPageProps {
    pub hash: String,
}

#[function_component(TorrentPage)]
pub(crate) fn torrent_page(props: &TorrentPageProps) -> Html {
    let i18n = use_i18n();
    let navigator = use_navigator();
    let from = use_location()
        .and_then(|location| query_param(location.query_str(), "from"))
        .unwrap_or_default();
    let Ok(hash) = InfoHash::parse(&props.hash) else {
        return html! {
            <section class="not-found">
                <h1>{i18n.t("not_found.title")}</h1>
            </section>
        };
    };
    let magnet = magnet_link(&hash);
    let on_copy = {
        let magnet = magnet.clone();
        let success = i18n.t("torrent.copy_success");
        let failure = i18n.t("common.error");
        Callback::from(move |_: MouseEvent| {
            copy_magnet(magnet.clone(), success.clone(), failure.clone());
        })
    };
    let back = SearchRequest::new(&from);
    let back_href = back.to_url();
    let on_back = Callback::from(move |event: MouseEvent| {
        event.prevent_default();
        RouterAddressBar::new(navigator.clone()).push(&back);
    });

    html! {
        <section class="torrent-detail">
            <code class="hash">{hash.to_string()}</code>
            <a class="magnet" href={magnet}>{"magnet"}</a>
            <button class="copy" onclick={on_copy}>{i18n.t("common.copy")}</button>
            <a class="back" href={back_href} onclick={on_back}>{i18n.t("not_found.back_home")}</a>
        </section>
    }
}
