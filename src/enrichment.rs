//! State machines for the two asynchronous enrichment channels (pie chart
//! image, savings advice). Each channel is a single tagged union so loading,
//! result and error can never disagree, and a request cannot be re-entered
//! while one is already in flight.

use std::rc::Rc;
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq, Default)]
pub enum RequestState<T> {
    #[default]
    Idle,
    Loading,
    Succeeded(T),
    Failed(String),
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }
}

/// Both channels together. They are independent: chart and advice may be
/// Loading at the same time, and finishing one leaves the other untouched.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct EnrichmentCoordinator {
    chart: RequestState<String>,
    advice: RequestState<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EnrichmentAction {
    ChartRequested,
    ChartFinished(Result<String, String>),
    AdviceRequested,
    AdviceFinished(Result<String, String>),
    Reset,
}

impl EnrichmentCoordinator {
    pub fn chart(&self) -> &RequestState<String> {
        &self.chart
    }

    pub fn advice(&self) -> &RequestState<String> {
        &self.advice
    }

    /// Moves the chart channel to Loading. Returns false, without changing
    /// state, when a chart request is already in flight; the caller must not
    /// start a second one.
    pub fn begin_chart(&mut self) -> bool {
        begin(&mut self.chart)
    }

    pub fn finish_chart(&mut self, result: Result<String, String>) {
        finish(&mut self.chart, result);
    }

    pub fn begin_advice(&mut self) -> bool {
        begin(&mut self.advice)
    }

    pub fn finish_advice(&mut self, result: Result<String, String>) {
        finish(&mut self.advice, result);
    }

    /// Both channels back to Idle; used when the session ends.
    pub fn reset(&mut self) {
        self.chart = RequestState::Idle;
        self.advice = RequestState::Idle;
    }
}

fn begin<T>(state: &mut RequestState<T>) -> bool {
    if state.is_loading() {
        return false;
    }
    *state = RequestState::Loading;
    true
}

fn finish<T>(state: &mut RequestState<T>, result: Result<T, String>) {
    *state = match result {
        Ok(payload) => RequestState::Succeeded(payload),
        Err(reason) => RequestState::Failed(reason),
    };
}

impl Reducible for EnrichmentCoordinator {
    type Action = EnrichmentAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            EnrichmentAction::ChartRequested => {
                next.begin_chart();
            }
            EnrichmentAction::ChartFinished(result) => next.finish_chart(result),
            EnrichmentAction::AdviceRequested => {
                next.begin_advice();
            }
            EnrichmentAction::AdviceFinished(result) => next.finish_advice(result),
            EnrichmentAction::Reset => next.reset(),
        }
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_trigger_while_loading_starts_one_request() {
        let mut coordinator = EnrichmentCoordinator::default();
        let mut backend_calls = 0;
        for _ in 0..3 {
            if coordinator.begin_chart() {
                backend_calls += 1;
            }
        }
        assert_eq!(backend_calls, 1);
        assert!(coordinator.chart().is_loading());
    }

    #[test]
    fn channels_are_independent() {
        let mut coordinator = EnrichmentCoordinator::default();
        assert!(coordinator.begin_chart());
        assert!(coordinator.begin_advice());
        assert!(coordinator.chart().is_loading());
        assert!(coordinator.advice().is_loading());

        coordinator.finish_advice(Ok("spend less".to_string()));
        assert!(coordinator.chart().is_loading());
        assert_eq!(
            coordinator.advice(),
            &RequestState::Succeeded("spend less".to_string())
        );
    }

    #[test]
    fn terminal_state_persists_until_the_next_trigger() {
        let mut coordinator = EnrichmentCoordinator::default();
        coordinator.begin_chart();
        coordinator.finish_chart(Err("server exploded".to_string()));
        assert_eq!(
            coordinator.chart(),
            &RequestState::Failed("server exploded".to_string())
        );

        // A failed channel may be retried.
        assert!(coordinator.begin_chart());
        assert!(coordinator.chart().is_loading());
    }

    #[test]
    fn new_request_supersedes_a_previous_result() {
        let mut coordinator = EnrichmentCoordinator::default();
        coordinator.begin_advice();
        coordinator.finish_advice(Ok("old advice".to_string()));
        assert!(coordinator.begin_advice());
        assert!(coordinator.advice().is_loading());
    }

    #[test]
    fn reset_returns_both_channels_to_idle() {
        let mut coordinator = EnrichmentCoordinator::default();
        coordinator.begin_chart();
        coordinator.finish_chart(Ok("blob:chart".to_string()));
        coordinator.begin_advice();
        coordinator.reset();
        assert_eq!(coordinator.chart(), &RequestState::Idle);
        assert_eq!(coordinator.advice(), &RequestState::Idle);
    }

    #[test]
    fn reducer_ignores_requests_while_loading() {
        let state = Rc::new(EnrichmentCoordinator::default());
        let state = state.reduce(EnrichmentAction::ChartRequested);
        let again = state.clone().reduce(EnrichmentAction::ChartRequested);
        assert_eq!(*again, *state);

        let done = again.reduce(EnrichmentAction::ChartFinished(Ok("blob:x".to_string())));
        assert_eq!(done.chart(), &RequestState::Succeeded("blob:x".to_string()));
        assert_eq!(done.advice(), &RequestState::Idle);
    }
}
