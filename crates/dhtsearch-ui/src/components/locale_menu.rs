//! Locale switcher in the top bar.
//!
//! The active locale comes from context; the caller applies the choice.

use crate::app::use_i18n;
use crate::i18n::LocaleCode;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct LocaleMenuProps {
    pub on_select: Callback<LocaleCode>,
}

#[function_component(LocaleMenu)]
pub(crate) fn locale_menu(props: &LocaleMenuProps) -> Html {
    let i18n = use_i18n();
    let onchange = {
        let on_select = props.on_select.clone();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            if let Some(locale) = LocaleCode::from_lang_tag(&select.value()) {
                on_select.emit(locale);
            }
        })
    };

    html! {
        <select class="locale-menu" aria-label="Locale" {onchange}>
            {for LocaleCode::all().iter().map(|locale| html! {
                <option value={locale.code()} selected={*locale == i18n.locale}>
                    {i18n.t(locale.label_key())}
                </option>
            })}
        </select>
    }
}
