use shared::{PageConfig, TableQuery};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlInputElement, HtmlTableElement};
use yew::prelude::*;

use crate::services::dom;
use crate::services::errors::{describe_js, BehaviorError};
use crate::services::logging::Logger;

const COMPONENT: &str = "table";
const RIGHT_ALIGN_CLASS: &str = "dt-body-right";

#[derive(Properties, PartialEq)]
pub struct TableControlsProps {
    /// Body rows of the expense table, in document order
    pub rows: Vec<HtmlElement>,
    pub page_size: usize,
}

/// Search box and pager for a server-rendered table.
///
/// Rows stay where the server put them; the ones outside the current page
/// (or not matching the search) are hidden.
#[function_component(TableControls)]
pub fn table_controls(props: &TableControlsProps) -> Html {
    let search = use_state(String::new);
    let page = use_state(|| 0usize);

    let row_texts: Vec<String> = props
        .rows
        .iter()
        .map(|row| row.text_content().unwrap_or_default())
        .collect();
    let query = TableQuery {
        search: (*search).clone(),
        page: *page,
        page_size: props.page_size,
    };
    let view = query.apply(&row_texts);

    {
        let rows = props.rows.clone();
        let visible = view.visible.clone();
        use_effect_with(visible, move |visible| {
            for (index, row) in rows.iter().enumerate() {
                let display = if visible.contains(&index) { "" } else { "none" };
                let _ = row.style().set_property("display", display);
            }
            || ()
        });
    }

    let on_search = {
        let search = search.clone();
        let page = page.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            search.set(input.value());
            page.set(0);
        })
    };

    let on_previous = {
        let page = page.clone();
        let current = view.page;
        Callback::from(move |_: MouseEvent| page.set(current.saturating_sub(1)))
    };

    let on_next = {
        let page = page.clone();
        let current = view.page;
        Callback::from(move |_: MouseEvent| page.set(current + 1))
    };

    html! {
        <div class="table-controls d-flex justify-content-between align-items-center mb-2">
            <input
                type="search"
                class="form-control form-control-sm table-search"
                placeholder="Search"
                aria-label="Search expenses"
                value={(*search).clone()}
                oninput={on_search}
            />
            <div class="table-pager btn-group btn-group-sm">
                <button type="button" class="btn btn-outline-secondary" disabled={!view.has_previous()} onclick={on_previous}>
                    {"Previous"}
                </button>
                <span class="btn btn-outline-secondary disabled">
                    {format!("{} / {}", view.page + 1, view.page_count)}
                </span>
                <button type="button" class="btn btn-outline-secondary" disabled={!view.has_next()} onclick={on_next}>
                    {"Next"}
                </button>
            </div>
        </div>
    }
}

/// Body rows (`<tbody><tr>`) of the table
fn body_rows(table: &HtmlTableElement) -> Vec<HtmlElement> {
    let bodies = table.t_bodies();
    let mut rows = Vec::new();
    for body_index in 0..bodies.length() {
        let Some(body) = bodies.item(body_index) else {
            continue;
        };
        let children = body.children();
        for row_index in 0..children.length() {
            if let Some(row) = children.item(row_index).and_then(|row| row.dyn_into::<HtmlElement>().ok()) {
                rows.push(row);
            }
        }
    }
    rows
}

fn right_align_column(rows: &[HtmlElement], column: usize) {
    for row in rows {
        if let Some(cell) = row.children().item(column as u32) {
            let _ = cell.class_list().add_1(RIGHT_ALIGN_CLASS);
        }
    }
}

/// Mounts the search/pager controls just above the expense table
pub fn install(config: &PageConfig) {
    let Some(table) = dom::optional_element::<HtmlTableElement>(COMPONENT, &config.table_id) else {
        return;
    };

    let rows = body_rows(&table);
    right_align_column(&rows, config.table_amount_column);

    let host: Element = match dom::document().and_then(|doc| {
        doc.create_element("div")
            .map_err(|e| BehaviorError::InvalidPageData(describe_js(&e)))
    }) {
        Ok(host) => host,
        Err(e) => {
            Logger::warn_with_component(COMPONENT, &format!("Table controls not mounted: {}", e));
            return;
        }
    };
    if table.before_with_node_1(&host).is_err() {
        Logger::warn_with_component(COMPONENT, "Table has no parent, controls not mounted");
        return;
    }

    Logger::debug_with_component(COMPONENT, &format!("Paging {} rows of #{}", rows.len(), config.table_id));
    yew::Renderer::<TableControls>::with_root_and_props(
        host,
        TableControlsProps {
            rows,
            page_size: config.table_page_size,
        },
    )
    .render();
}
