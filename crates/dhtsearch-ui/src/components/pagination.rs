use crate::app::use_i18n;
use crate::features::search::{PageSlot, Pagination};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct PaginationBarProps {
    pub bar: Pagination,
    pub on_select: Callback<u32>,
}

#[function_component(PaginationBar)]
pub(crate) fn pagination_bar(props: &PaginationBarProps) -> Html {
    let i18n = use_i18n();
    let bar = &props.bar;
    let go = |page: Option<u32>| {
        let on_select = props.on_select.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(page) = page {
                on_select.emit(page);
            }
        })
    };

    html! {
        <nav class="pagination">
            <button disabled={bar.prev().is_none()} onclick={go(bar.prev())}>
                {i18n.t("search.prev_page")}
            </button>
            {for bar.slots.iter().map(|slot| match *slot {
                PageSlot::Page(page) => html! {
                    <button
                        class={classes!("page", (page == bar.current).then_some("active"))}
                        onclick={go(Some(page))}
                    >
                        {page.to_string()}
                    </button>
                },
                PageSlot::Ellipsis => html! { <span class="ellipsis">{"…"}</span> },
            })}
            <button disabled={bar.next().is_none()} onclick={go(bar.next())}>
                {i18n.t("search.next_page")}
            </button>
        </nav>
    }
}
