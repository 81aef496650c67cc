use crate::components::locale_menu::LocaleMenu;
use crate::components::search_page::{HomePage, SearchPage};
use crate::components::toast::ToastHost;
use crate::components::torrent_page::TorrentPage;
use crate::config::SiteConfig;
use crate::i18n::{LocaleCode, LocaleResolver, MemoryLocaleStore};
use crate::telemetry::{LoggingConfig, init_logging};
use preferences::BrowserLocaleStore;
pub(crate) use preferences::api_base_url;
pub(crate) use routes::Route;
use std::rc::Rc;
use yew::prelude::*;
use yew_router::prelude::*;

mod preferences;
mod routes;

/// Locale handle plus the active code, so consumers re-render on a switch.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct I18nCtx {
    pub(crate) resolver: LocaleResolver,
    pub(crate) locale: LocaleCode,
}

impl I18nCtx {
    fn detached() -> Self {
        let resolver = LocaleResolver::new(MemoryLocaleStore::default());
        let locale = resolver.locale();
        Self { resolver, locale }
    }

    pub(crate) fn t(&self, key: &str) -> String {
        self.resolver.resolve(key)
    }
}

#[hook]
pub(crate) fn use_i18n() -> I18nCtx {
    use_context::<I18nCtx>().unwrap_or_else(I18nCtx::detached)
}

#[hook]
pub(crate) fn use_site() -> Rc<SiteConfig> {
    use_context::<Rc<SiteConfig>>().unwrap_or_default()
}

#[function_component(DhtSearchApp)]
fn dhtsearch_app() -> Html {
    let site = use_memo(|_| SiteConfig::default(), ());
    let resolver = {
        let key = site.locale_storage_key.clone();
        use_memo(
            move |_| LocaleResolver::new(BrowserLocaleStore::new(key)),
            (),
        )
    };
    let locale = use_state(|| resolver.locale());
    {
        let resolver = (*resolver).clone();
        let locale = locale.clone();
        use_effect_with_deps(
            move |_| {
                locale.set(resolver.hydrate());
                || ()
            },
            (),
        );
    }
    let on_locale = {
        let resolver = (*resolver).clone();
        let locale = locale.clone();
        Callback::from(move |next: LocaleCode| {
            resolver.set_locale(next);
            locale.set(next);
        })
    };
    let i18n = I18nCtx {
        resolver: (*resolver).clone(),
        locale: *locale,
    };

    html! {
        <ContextProvider<Rc<SiteConfig>> context={site.clone()}>
            <ContextProvider<I18nCtx> context={i18n}>
                <BrowserRouter>
                    <header class="topbar">
                        <Link<Route> to={Route::Home} classes="brand">{site.name.clone()}</Link<Route>>
                        <LocaleMenu on_select={on_locale} />
                    </header>
                    <main class="content">
                        <Switch<Route> render={switch} />
                    </main>
                    <ToastHost />
                </BrowserRouter>
            </ContextProvider<I18nCtx>>
        </ContextProvider<Rc<SiteConfig>>>
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <HomePage /> },
        Route::Search => html! { <SearchPage /> },
        Route::Torrent { hash } => html! { <TorrentPage {hash} /> },
        Route::NotFound => html! { <NotFound /> },
    }
}

#[function_component(NotFound)]
fn not_found() -> Html {
    let i18n = use_i18n();
    html! {
        <section class="not-found">
            <h1>{i18n.t("not_found.title")}</h1>
            <Link<Route> to={Route::Home}>{i18n.t("not_found.back_home")}</Link<Route>>
        </section>
    }
}

/// Mount the app on `#root` (or `<body>`), after installing logging.
pub fn run_app() {
    console_error_panic_hook::set_once();
    let site = SiteConfig::default();
    let logging = LoggingConfig {
        level: &site.log_level,
        ..LoggingConfig::default()
    };
    if let Err(err) = init_logging(&logging) {
        gloo::console::warn!(err.to_string());
    }
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<DhtSearchApp>::with_root(root).render();
    } else {
        yew::Renderer::<DhtSearchApp>::new().render();
    }
}
