//! Home and search pages.
//!
//! # Design
//! - The address bar is the source of truth: the page follows `use_location`
//!   and every user action pushes a new URL before fetching.
//! - The controller lives for the lifetime of the page and re-renders it
//!   through a force-update listener.

use crate::app::{I18nCtx, Route, api_base_url, use_i18n, use_site};
use crate::components::pagination::PaginationBar;
use crate::components::search_box::SearchBox;
use crate::components::torrent_card::TorrentCard;
use crate::core::notify::NotificationBus;
use crate::features::search::{
    AddressBar, FetchState, Pagination, SearchController, SearchFilters, SearchOrchestrator,
    SearchRequest, SearchResult, format_count,
};
use crate::i18n::I18nArg;
use crate::services::api::ApiClient;
use dhtsearch_api_models::SortKey;
use std::future::Future;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_router::prelude::*;

type PageController = SearchController<ApiClient, RouterAddressBar>;

/// Writes search URLs through the router's navigator.
pub(crate) struct RouterAddressBar {
    navigator: Option<Navigator>,
}

impl RouterAddressBar {
    pub(crate) const fn new(navigator: Option<Navigator>) -> Self {
        Self { navigator }
    }
}

impl AddressBar for RouterAddressBar {
    fn push(&self, request: &SearchRequest) {
        let Some(navigator) = &self.navigator else {
            tracing::warn!("no router available; address bar not updated");
            return;
        };
        if let Err(err) = navigator.push_with_query(&Route::Search, &request.query_pairs()) {
            tracing::warn!(error = %err, "failed to update address bar");
        }
    }
}

fn spawn<F: Future<Output = ()> + 'static>(task: F) {
    yew::platform::spawn_local(task);
}

#[function_component(HomePage)]
pub(crate) fn home_page() -> Html {
    let i18n = use_i18n();
    let site = use_site();
    let navigator = use_navigator();
    let on_submit = {
        let i18n = i18n.clone();
        Callback::from(move |raw: String| {
            match SearchOrchestrator::new(site.max_keyword_len).submit_keyword(&raw) {
                Ok(request) => RouterAddressBar::new(navigator.clone()).push(&request),
                Err(err) => NotificationBus::global().warning(err.user_message(&i18n.resolver)),
            }
        })
    };

    html! {
        <section class="home">
            <h1>{i18n.t("common.search")}</h1>
            <SearchBox {on_submit} />
        </section>
    }
}

#[function_component(SearchPage)]
pub(crate) fn search_page() -> Html {
    let i18n = use_i18n();
    let site = use_site();
    let navigator = use_navigator();
    let location = use_location();
    let update = use_force_update();
    let controller = {
        let resolver = i18n.resolver.clone();
        use_memo(
            move |_| {
                let controller: PageController = SearchController::new(
                    ApiClient::new(api_base_url(&site)),
                    RouterAddressBar::new(navigator),
                    NotificationBus::global().clone(),
                    resolver,
                    (*site).clone(),
                );
                controller.set_listener(move || update.force_update());
                controller
            },
            (),
        )
    };
    {
        let controller = (*controller).clone();
        let query = location
            .map(|location| location.query_str().to_string())
            .unwrap_or_default();
        use_effect_with_deps(
            move |query: &String| {
                let query = query.clone();
                spawn(async move { controller.on_location(&query).await });
                || ()
            },
            query,
        );
    }
    use_effect_with_deps(
        |title: &String| {
            gloo::utils::document().set_title(title);
            || ()
        },
        controller.title(),
    );

    let request = controller.request();
    let on_submit = {
        let controller = (*controller).clone();
        Callback::from(move |raw: String| {
            let controller = controller.clone();
            spawn(async move {
                if let Err(err) = controller.submit_keyword(&raw).await {
                    tracing::debug!(error = %err, "search input rejected");
                }
            });
        })
    };
    let on_sort = {
        let controller = (*controller).clone();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            if let Some(sort) = SortKey::parse(&select.value()) {
                let controller = controller.clone();
                spawn(async move { controller.set_sort(sort).await });
            }
        })
    };
    let on_filter = |toggle: fn(&mut SearchFilters, bool)| {
        let controller = (*controller).clone();
        let current = request.filters();
        Callback::from(move |event: Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            let mut filters = current;
            toggle(&mut filters, input.checked());
            let controller = controller.clone();
            spawn(async move { controller.set_filters(filters).await });
        })
    };
    let on_page = {
        let controller = (*controller).clone();
        Callback::from(move |page: u32| {
            let controller = controller.clone();
            spawn(async move {
                if let Err(err) = controller.set_page(page).await {
                    tracing::debug!(error = %err, "page change rejected");
                }
            });
        })
    };

    let body = match controller.snapshot() {
        FetchState::Idle => html! {},
        FetchState::Loading => html! { <p class="loading">{i18n.t("common.loading")}</p> },
        FetchState::Failure(failure) => html! {
            <div class="error" role="alert">
                <p>{failure.message}</p>
                <p class="hint">{i18n.t("common.check_network")}</p>
            </div>
        },
        FetchState::Success(result) if result.items.is_empty() => html! {
            <div class="empty">
                <p>{i18n.t("search.no_results")}</p>
                <p class="hint">{i18n.t("search.try_other")}</p>
            </div>
        },
        FetchState::Success(result) => render_results(&result, &request, &i18n, on_page),
    };
    let filters = request.filters();

    html! {
        <section class="search">
            <SearchBox initial={request.keyword().to_string()} {on_submit} />
            <div class="controls">
                <label>
                    {i18n.t("search.sort_by")}
                    <select onchange={on_sort}>
                        {for SortKey::all().iter().map(|sort| html! {
                            <option value={sort.as_str()} selected={*sort == request.sort()}>
                                {i18n.t(&format!("search.sort_options.{}", sort.as_str()))}
                            </option>
                        })}
                    </select>
                </label>
                <label>
                    <input
                        type="checkbox"
                        checked={filters.has_video}
                        onchange={on_filter(|filters, on| filters.has_video = on)}
                    />
                    {i18n.t("search.filters.video")}
                </label>
                <label>
                    <input
                        type="checkbox"
                        checked={filters.has_audio}
                        onchange={on_filter(|filters, on| filters.has_audio = on)}
                    />
                    {i18n.t("search.filters.audio")}
                </label>
            </div>
            {body}
        </section>
    }
}

fn render_results(
    result: &SearchResult,
    request: &SearchRequest,
    i18n: &I18nCtx,
    on_page: Callback<u32>,
) -> Html {
    let count = i18n.resolver.resolve_with(
        "search.results_count",
        &[I18nArg::new("count", format_count(result.total_count))],
    );
    let bar = Pagination::new(request.page(), result.total_pages);
    html! {
        <>
            <p class="count">{count}</p>
            <div class="results">
                {for result.items.iter().map(|torrent| html! {
                    <TorrentCard
                        key={torrent.info_hash.to_string()}
                        torrent={torrent.clone()}
                        keyword={request.keyword().to_string()}
                    />
                })}
            </div>
            if let Some(bar) = bar {
                <PaginationBar {bar} on_select={on_page} />
            }
        </>
    }
}
