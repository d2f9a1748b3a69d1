//! Presentation components: form wiring and rendering only. All session,
//! collection and enrichment state lives in the `App` controller.

use wasm_bindgen_futures::spawn_local;
use web_sys::{InputEvent, SubmitEvent};
use yew::prelude::*;

use crate::aggregate::Aggregate;
use crate::api::{ApiClient, Expense, NewExpense};
use crate::enrichment::RequestState;

/// User input must parse to a finite number before it is sent anywhere.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|amount| amount.is_finite())
}

fn format_amount(amount: f64) -> String {
    format!("${:.2}", amount)
}

fn input_value(e: &InputEvent) -> String {
    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
    input.value()
}

#[derive(Properties, PartialEq)]
pub struct AuthScreenProps {
    pub api: ApiClient,
    pub on_authenticated: Callback<String>,
}

#[function_component(AuthScreen)]
pub fn auth_screen(props: &AuthScreenProps) -> Html {
    let is_login = use_state(|| true);
    let username = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let notice = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let on_submit = {
        let is_login = is_login.clone();
        let username = username.clone();
        let password = password.clone();
        let error = error.clone();
        let notice = notice.clone();
        let loading = loading.clone();
        let api = props.api.clone();
        let on_authenticated = props.on_authenticated.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *loading {
                return;
            }

            let username_val = username.trim().to_string();
            let password_val = (*password).clone();
            if username_val.is_empty() || password_val.is_empty() {
                error.set(Some("Username and password are required.".to_string()));
                return;
            }

            error.set(None);
            notice.set(None);
            loading.set(true);

            let is_login_now = *is_login;
            let is_login = is_login.clone();
            let error = error.clone();
            let notice = notice.clone();
            let loading = loading.clone();
            let api = api.clone();
            let on_authenticated = on_authenticated.clone();
            spawn_local(async move {
                if is_login_now {
                    match api.login(&username_val, &password_val).await {
                        Ok(token) => on_authenticated.emit(token),
                        Err(err) => error.set(Some(err.to_string())),
                    }
                } else {
                    match api.register(&username_val, &password_val).await {
                        Ok(()) => {
                            notice.set(Some(
                                "Account created. You can sign in now.".to_string(),
                            ));
                            is_login.set(true);
                        }
                        Err(err) => error.set(Some(err.to_string())),
                    }
                }
                loading.set(false);
            });
        })
    };

    let toggle_mode = {
        let is_login = is_login.clone();
        let error = error.clone();
        let notice = notice.clone();
        Callback::from(move |_| {
            is_login.set(!*is_login);
            error.set(None);
            notice.set(None);
        })
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-background">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold text-foreground">{"Monthly Expense Tracker"}</h1>
                    <p class="text-sm text-muted-foreground mt-2">
                        { if *is_login { "Sign in to see your expenses." } else { "Create an account to get started." } }
                    </p>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Username"}</label>
                        <input
                            class="w-full px-4 py-2 bg-input border border-input rounded-lg text-foreground"
                            value={(*username).clone()}
                            oninput={{
                                let username = username.clone();
                                Callback::from(move |e: InputEvent| username.set(input_value(&e)))
                            }}
                        />
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Password"}</label>
                        <input
                            type="password"
                            class="w-full px-4 py-2 bg-input border border-input rounded-lg text-foreground"
                            value={(*password).clone()}
                            oninput={{
                                let password = password.clone();
                                Callback::from(move |e: InputEvent| password.set(input_value(&e)))
                            }}
                        />
                    </div>

                    if let Some(msg) = &*error {
                        <div class="text-sm text-red-500">{ msg.clone() }</div>
                    }
                    if let Some(msg) = &*notice {
                        <div class="text-sm text-green-600">{ msg.clone() }</div>
                    }

                    <button
                        type="submit"
                        class="w-full bg-primary text-primary-foreground py-2 rounded-lg font-semibold hover:opacity-90"
                        disabled={*loading}
                    >
                        { if *loading { "Please wait..." } else if *is_login { "Login" } else { "Register" } }
                    </button>
                </form>

                <div class="mt-6 text-center text-sm text-muted-foreground">
                    { if *is_login { "No account?" } else { "Already registered?" } }
                    <button class="ml-2 text-primary font-semibold" onclick={toggle_mode}>
                        { if *is_login { "Register" } else { "Login" } }
                    </button>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct AddExpenseFormProps {
    pub api: ApiClient,
    pub token: String,
    pub on_added: Callback<()>,
}

#[function_component(AddExpenseForm)]
pub fn add_expense_form(props: &AddExpenseFormProps) -> Html {
    let category = use_state(String::new);
    let amount = use_state(String::new);
    let date = use_state(String::new);
    let error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    let on_submit = {
        let category = category.clone();
        let amount = amount.clone();
        let date = date.clone();
        let error = error.clone();
        let saving = saving.clone();
        let api = props.api.clone();
        let token = props.token.clone();
        let on_added = props.on_added.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *saving {
                return;
            }

            let category_val = category.trim().to_string();
            let date_val = date.trim().to_string();
            if category_val.is_empty() || date_val.is_empty() || amount.trim().is_empty() {
                error.set(Some("Please complete all fields.".to_string()));
                return;
            }
            let amount_val = match parse_amount(&amount) {
                Some(a) => a,
                None => {
                    error.set(Some("Amount must be a number.".to_string()));
                    return;
                }
            };

            error.set(None);
            saving.set(true);

            let category = category.clone();
            let amount = amount.clone();
            let date = date.clone();
            let error = error.clone();
            let saving = saving.clone();
            let api = api.clone();
            let token = token.clone();
            let on_added = on_added.clone();
            spawn_local(async move {
                let entry = NewExpense {
                    category: category_val,
                    amount: amount_val,
                    date: date_val,
                };
                match api.add_expense(Some(&token), &entry).await {
                    Ok(()) => {
                        category.set(String::new());
                        amount.set(String::new());
                        date.set(String::new());
                        // The new record becomes visible through a refetch.
                        on_added.emit(());
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
                saving.set(false);
            });
        })
    };

    html! {
        <div class="bg-card rounded-[10px] p-6 border border-border">
            <h3 class="font-bold text-foreground text-lg mb-4">{"Add Expense"}</h3>
            <form class="grid grid-cols-1 md:grid-cols-4 gap-3" onsubmit={on_submit}>
                <input
                    placeholder="Category"
                    class="p-2 border rounded"
                    value={(*category).clone()}
                    oninput={{
                        let category = category.clone();
                        Callback::from(move |e: InputEvent| category.set(input_value(&e)))
                    }}
                />
                <input
                    placeholder="Amount"
                    class="p-2 border rounded"
                    value={(*amount).clone()}
                    oninput={{
                        let amount = amount.clone();
                        Callback::from(move |e: InputEvent| amount.set(input_value(&e)))
                    }}
                />
                <input
                    type="date"
                    class="p-2 border rounded"
                    value={(*date).clone()}
                    oninput={{
                        let date = date.clone();
                        Callback::from(move |e: InputEvent| date.set(input_value(&e)))
                    }}
                />
                <button
                    type="submit"
                    class="bg-primary text-primary-foreground px-4 py-2 rounded font-semibold"
                    disabled={*saving}
                >
                    { if *saving { "Saving..." } else { "Add Expense" } }
                </button>
            </form>
            if let Some(msg) = &*error {
                <p class="text-sm text-red-500 mt-3">{ msg.clone() }</p>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ExpenseListProps {
    pub expenses: Vec<Expense>,
    pub loading: bool,
}

#[function_component(ExpenseList)]
pub fn expense_list(props: &ExpenseListProps) -> Html {
    html! {
        <div class="bg-card rounded-[10px] border border-border overflow-hidden">
            <div class="p-6 border-b border-border">
                <h3 class="font-bold text-foreground text-lg">{"Your Expenses"}</h3>
            </div>
            {
                if props.loading {
                    html! { <p class="p-6 text-sm text-muted-foreground">{"Loading..."}</p> }
                } else if props.expenses.is_empty() {
                    html! { <p class="p-6 text-sm text-muted-foreground">{"No expenses yet."}</p> }
                } else {
                    html! {
                        <table class="w-full text-left border-collapse">
                            <thead>
                                <tr class="bg-muted/50 text-muted-foreground text-[10px] uppercase tracking-widest">
                                    <th class="px-6 py-3 font-bold">{"Category"}</th>
                                    <th class="px-6 py-3 font-bold text-right">{"Amount"}</th>
                                    <th class="px-6 py-3 font-bold">{"Date"}</th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-border">
                                { for props.expenses.iter().enumerate().map(|(idx, expense)| html! {
                                    <tr key={expense.id.map(|id| id.to_string()).unwrap_or_else(|| format!("row-{idx}"))} class="text-sm">
                                        <td class="px-6 py-3 text-foreground">{ &expense.category }</td>
                                        <td class="px-6 py-3 text-right font-semibold text-foreground">{ format_amount(expense.amount) }</td>
                                        <td class="px-6 py-3 text-muted-foreground">{ &expense.date }</td>
                                    </tr>
                                }) }
                            </tbody>
                        </table>
                    }
                }
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SpendingSummaryProps {
    pub aggregate: Aggregate,
}

#[function_component(SpendingSummary)]
pub fn spending_summary(props: &SpendingSummaryProps) -> Html {
    html! {
        <div class="bg-card rounded-[10px] p-6 border border-border">
            <h3 class="font-bold text-foreground text-lg mb-2">{"Monthly Report"}</h3>
            <p class="text-sm text-muted-foreground">
                { format!("Total Spent: {}", format_amount(props.aggregate.total_spent)) }
            </p>
            {
                if props.aggregate.by_category.is_empty() {
                    html! { <p class="text-sm text-muted-foreground mt-3">{"No expenses to show."}</p> }
                } else {
                    html! {
                        <div class="mt-3 space-y-1">
                            { for props.aggregate.by_category.iter().map(|(category, sum)| html! {
                                <div class="flex items-center justify-between text-sm">
                                    <span class="text-foreground">{ category.clone() }</span>
                                    <span class="font-semibold">{ format_amount(*sum) }</span>
                                </div>
                            }) }
                        </div>
                    }
                }
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct InsightsPanelProps {
    pub chart: RequestState<String>,
    pub advice: RequestState<String>,
    pub on_chart: Callback<()>,
    pub on_advice: Callback<()>,
}

#[function_component(InsightsPanel)]
pub fn insights_panel(props: &InsightsPanelProps) -> Html {
    let on_chart = {
        let on_chart = props.on_chart.clone();
        Callback::from(move |_| on_chart.emit(()))
    };
    let on_advice = {
        let on_advice = props.on_advice.clone();
        Callback::from(move |_| on_advice.emit(()))
    };

    html! {
        <div class="bg-card rounded-[10px] p-6 border border-border space-y-4">
            <h3 class="font-bold text-foreground text-lg">{"Insights"}</h3>

            <button
                onclick={on_chart}
                class="bg-primary text-primary-foreground px-4 py-2 rounded font-semibold"
                disabled={props.chart.is_loading()}
            >
                { if props.chart.is_loading() { "Generating Pie Chart..." } else { "View Spending Pie Chart" } }
            </button>
            {
                match &props.chart {
                    RequestState::Succeeded(src) => html! {
                        <img src={src.clone()} alt="Spending by Category Pie Chart" class="w-full rounded" />
                    },
                    RequestState::Failed(reason) => html! {
                        <p class="text-sm text-red-500">{ reason.clone() }</p>
                    },
                    _ => html! {},
                }
            }

            <button
                onclick={on_advice}
                class="bg-primary text-primary-foreground px-4 py-2 rounded font-semibold"
                disabled={props.advice.is_loading()}
            >
                { if props.advice.is_loading() { "Getting Suggestions..." } else { "Get Suggestions to Improve Savings" } }
            </button>
            {
                match &props.advice {
                    RequestState::Succeeded(text) => html! {
                        <p class="text-sm text-foreground">{ format!("Advice: {}", text) }</p>
                    },
                    RequestState::Failed(reason) => html! {
                        <p class="text-sm text-red-500">{ reason.clone() }</p>
                    },
                    _ => html! {},
                }
            }
        </div>
    }
}
