//! Application controller: composes the session store, the expense
//! collection, the aggregation and the enrichment channels, and decides
//! between the anonymous and authenticated views.

use gloo_console::error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::aggregate::compute_aggregate;
use crate::api::{ApiClient, Expense};
use crate::enrichment::{EnrichmentAction, EnrichmentCoordinator};
use crate::session::{LocalStorageSlot, SessionStore};
use crate::views::{AddExpenseForm, AuthScreen, ExpenseList, InsightsPanel, SpendingSummary};

#[function_component(App)]
pub fn app() -> Html {
    let api = ApiClient::default();
    let session = use_state(|| SessionStore::new(LocalStorageSlot));
    let expenses = use_state(Vec::<Expense>::new);
    let fetching = use_state(|| false);
    let refresh = use_state(|| 0u32);
    let enrichment = use_reducer(EnrichmentCoordinator::default);
    // Bumped on login and logout; async results from an older epoch are
    // dropped instead of being applied to a torn-down session.
    let epoch = use_mut_ref(|| 0u32);

    let token: Option<String> = session.token().map(str::to_owned);

    {
        let expenses = expenses.clone();
        let fetching = fetching.clone();
        let epoch = epoch.clone();
        let api = api.clone();
        use_effect_with_deps(
            move |(token, _refresh): &(Option<String>, u32)| {
                if let Some(token) = token.clone() {
                    let started = *epoch.borrow();
                    fetching.set(true);
                    spawn_local(async move {
                        let result = api.fetch_expenses(Some(&token)).await;
                        if *epoch.borrow() != started {
                            return;
                        }
                        match result {
                            Ok(list) => expenses.set(list),
                            Err(err) => {
                                error!(format!("failed to load expenses: {err}"));
                                expenses.set(Vec::new());
                            }
                        }
                        fetching.set(false);
                    });
                }
                || ()
            },
            (token.clone(), *refresh),
        );
    }

    let on_authenticated = {
        let session = session.clone();
        let epoch = epoch.clone();
        Callback::from(move |token: String| {
            *epoch.borrow_mut() += 1;
            let mut next = (*session).clone();
            next.set_token(token);
            session.set(next);
        })
    };

    let on_logout = {
        let session = session.clone();
        let expenses = expenses.clone();
        let fetching = fetching.clone();
        let enrichment = enrichment.dispatcher();
        let epoch = epoch.clone();
        Callback::from(move |_| {
            *epoch.borrow_mut() += 1;
            let mut next = (*session).clone();
            next.clear();
            session.set(next);
            expenses.set(Vec::new());
            fetching.set(false);
            enrichment.dispatch(EnrichmentAction::Reset);
        })
    };

    // A successful add is observed through a refetch, never merged locally.
    let on_added = {
        let refresh = refresh.clone();
        Callback::from(move |_| refresh.set(*refresh + 1))
    };

    let on_chart = {
        let enrichment = enrichment.clone();
        let epoch = epoch.clone();
        let api = api.clone();
        let token = token.clone();
        Callback::from(move |_| {
            if enrichment.chart().is_loading() {
                return;
            }
            enrichment.dispatch(EnrichmentAction::ChartRequested);

            let started = *epoch.borrow();
            let dispatcher = enrichment.dispatcher();
            let epoch = epoch.clone();
            let api = api.clone();
            let token = token.clone();
            spawn_local(async move {
                let result = api.pie_chart(token.as_deref()).await;
                if *epoch.borrow() != started {
                    return;
                }
                dispatcher.dispatch(EnrichmentAction::ChartFinished(
                    result.map_err(|err| err.to_string()),
                ));
            });
        })
    };

    let on_advice = {
        let enrichment = enrichment.clone();
        let epoch = epoch.clone();
        let api = api.clone();
        let token = token.clone();
        let expenses = expenses.clone();
        Callback::from(move |_| {
            if enrichment.advice().is_loading() {
                return;
            }
            enrichment.dispatch(EnrichmentAction::AdviceRequested);

            let started = *epoch.borrow();
            let dispatcher = enrichment.dispatcher();
            let epoch = epoch.clone();
            let api = api.clone();
            let token = token.clone();
            let collection = (*expenses).clone();
            spawn_local(async move {
                let result = api.advice(token.as_deref(), &collection).await;
                if *epoch.borrow() != started {
                    return;
                }
                dispatcher.dispatch(EnrichmentAction::AdviceFinished(
                    result.map_err(|err| err.to_string()),
                ));
            });
        })
    };

    let Some(token) = token else {
        return html! { <AuthScreen api={api} on_authenticated={on_authenticated} /> };
    };

    let aggregate = compute_aggregate(&expenses);

    html! {
        <div class="min-h-screen bg-background">
            <header class="bg-card border-b border-border h-16 flex items-center justify-between px-6">
                <h1 class="text-xl font-bold text-foreground">{"Monthly Expense Tracker"}</h1>
                <button
                    onclick={on_logout}
                    class="bg-secondary text-secondary-foreground px-4 py-2 rounded font-semibold"
                >
                    {"Logout"}
                </button>
            </header>
            <main class="p-6 max-w-4xl mx-auto space-y-6">
                <AddExpenseForm api={api.clone()} token={token} on_added={on_added} />
                <ExpenseList expenses={(*expenses).clone()} loading={*fetching} />
                <SpendingSummary aggregate={aggregate} />
                <InsightsPanel
                    chart={enrichment.chart().clone()}
                    advice={enrichment.advice().clone()}
                    on_chart={on_chart}
                    on_advice={on_advice}
                />
            </main>
        </div>
    }
}
