use crate::app::use_i18n;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct SearchBoxProps {
    #[prop_or_default]
    pub initial: String,
    pub on_submit: Callback<String>,
}

#[function_component(SearchBox)]
pub(crate) fn search_box(props: &SearchBoxProps) -> Html {
    let i18n = use_i18n();
    let value = use_state(|| props.initial.clone());
    {
        let value = value.clone();
        use_effect_with_deps(
            move |initial: &String| {
                value.set(initial.clone());
                || ()
            },
            props.initial.clone(),
        );
    }
    let oninput = {
        let value = value.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            value.set(input.value());
        })
    };
    let onsubmit = {
        let value = value.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            on_submit.emit((*value).clone());
        })
    };

    html! {
        <form class="search-box" role="search" {onsubmit}>
            <input
                type="search"
                value={(*value).clone()}
                placeholder={i18n.t("common.search_placeholder")}
                {oninput}
            />
            <button type="submit">{i18n.t("common.search")}</button>
        </form>
    }
}
