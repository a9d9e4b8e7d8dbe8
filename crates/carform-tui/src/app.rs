//! Application state management.

use carform_core::{
    ApiError, Car, CarApi, CarFormModal, CarList, Completion, Field, SubmitOutcome,
};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

/// Application state.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// Normal operation.
    Running,
    /// Application should quit.
    Quit,
}

/// Input mode for the application.
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    /// Navigating the car list.
    Normal,
    /// Search mode.
    Search,
    /// The car dialog is open.
    Modal,
}

/// Results delivered by background requests.
#[derive(Debug)]
pub enum Message {
    /// The car list finished loading.
    CarsLoaded {
        /// Which `reload` call produced it.
        generation: u64,
        result: Result<Vec<Car>, ApiError>,
    },
    /// A dialog submission finished.
    Submitted(Completion),
}

/// A search result.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched car.
    pub car: Car,
    /// Match score for sorting.
    pub score: i64,
}

/// Main application model.
pub struct App {
    /// Current application state.
    pub state: AppState,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Cars shown in the list.
    pub cars: CarList,
    /// Index of the selected car.
    pub selected_index: usize,
    /// Status line text.
    pub status_message: Option<String>,

    // Dialog state
    /// The open car dialog, if any.
    pub modal: Option<CarFormModal>,
    /// Index into [`Field::ALL`] of the focused dialog field.
    pub modal_focus: usize,

    // Search state
    /// Search query.
    pub search_query: String,
    /// Search results.
    pub search_results: Vec<SearchResult>,
    /// Selected search result index.
    pub search_selected_index: usize,

    /// Requests started but not yet answered.
    pub in_flight: usize,
    /// Generation of the most recent `reload`.
    load_generation: u64,
    /// Loads older than this were started before a saved change and are dropped.
    oldest_current_load: u64,
    api: Arc<dyn CarApi>,
    tx: Sender<Message>,
    rx: Receiver<Message>,
}

impl App {
    /// Create a new application instance.
    pub fn new(api: Arc<dyn CarApi>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            state: AppState::Running,
            input_mode: InputMode::Normal,
            cars: CarList::default(),
            selected_index: 0,
            status_message: None,
            modal: None,
            modal_focus: 0,
            search_query: String::new(),
            search_results: Vec::new(),
            search_selected_index: 0,
            in_flight: 0,
            load_generation: 0,
            oldest_current_load: 0,
            api,
            tx,
            rx,
        }
    }

    /// Run `job` on a worker thread and deliver its result to the event loop.
    fn spawn_request<F>(&mut self, job: F)
    where
        F: FnOnce(&dyn CarApi) -> Message + Send + 'static,
    {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.in_flight += 1;
        std::thread::spawn(move || {
            let message = job(api.as_ref());
            if tx.send(message).is_err() {
                tracing::debug!("Event loop gone, dropping request result");
            }
        });
    }

    /// Reload the car list from the backend.
    pub fn reload(&mut self) {
        tracing::info!("Loading cars");
        self.status_message = Some("Loading cars...".to_string());
        self.load_generation += 1;
        let generation = self.load_generation;
        self.spawn_request(move |api| Message::CarsLoaded {
            generation,
            result: api.list(),
        });
    }

    /// Apply every message that has arrived since the last call.
    pub fn process_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.handle_message(message);
        }
    }

    fn handle_message(&mut self, message: Message) {
        match message {
            Message::CarsLoaded { generation, .. } if generation < self.oldest_current_load => {
                tracing::debug!("Ignoring car list from before the last save");
            }
            Message::CarsLoaded { result: Ok(cars), .. } => {
                tracing::info!("Loaded {} cars", cars.len());
                self.cars.replace(cars);
                self.selected_index = self
                    .selected_index
                    .min(self.cars.len().saturating_sub(1));
                self.status_message = None;
            }
            Message::CarsLoaded { result: Err(e), .. } => {
                tracing::error!("Failed to load cars: {}", e);
                self.status_message = Some(format!("Failed to load cars: {e}"));
            }
            Message::Submitted(completion) => self.handle_completion(completion),
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        if completion.is_stale() {
            tracing::debug!("Ignoring answer for a closed car dialog");
            return;
        }
        let Some(modal) = self.modal.as_mut() else {
            return;
        };

        match modal.complete(completion) {
            SubmitOutcome::Saved(change) => {
                let plate = modal.car().license_plate_number.clone();
                self.cars.apply(change);
                self.oldest_current_load = self.load_generation + 1;
                if let Some(index) = self.cars.position(&plate) {
                    self.selected_index = index;
                }
                self.status_message = Some(format!("Saved {plate}"));
                self.dismiss_modal();
            }
            SubmitOutcome::Conflict
            | SubmitOutcome::Rejected { .. }
            | SubmitOutcome::Transport
            | SubmitOutcome::Discarded => {}
        }
    }

    /// Open the dialog for a new car.
    pub fn open_new_car(&mut self) {
        self.open_modal(None);
    }

    /// Open the dialog for the selected car.
    pub fn open_selected_car(&mut self) {
        if let Some(car) = self.cars.get(self.selected_index).cloned() {
            self.open_modal(Some(&car));
        }
    }

    fn open_modal(&mut self, initial: Option<&Car>) {
        self.modal = Some(CarFormModal::open(initial));
        self.modal_focus = 0;
        self.input_mode = InputMode::Modal;
        self.status_message = None;
    }

    /// Close the dialog without saving.
    pub fn close_modal(&mut self) {
        if let Some(modal) = self.modal.as_mut() {
            modal.close();
            tracing::info!("Car dialog closed");
        }
        self.dismiss_modal();
    }

    fn dismiss_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    /// Validate the dialog and, if valid, send it to the backend.
    pub fn submit_modal(&mut self) {
        let Some(request) = self.modal.as_mut().and_then(|modal| modal.submit()) else {
            return;
        };
        self.spawn_request(move |api| Message::Submitted(request.send(api)));
    }

    /// The dialog field that receives input.
    pub fn focused_field(&self) -> Field {
        Field::ALL[self.modal_focus % Field::ALL.len()]
    }

    /// Move dialog focus to the next field.
    pub fn focus_next(&mut self) {
        self.modal_focus = (self.modal_focus + 1) % Field::ALL.len();
    }

    /// Move dialog focus to the previous field.
    pub fn focus_prev(&mut self) {
        self.modal_focus = (self.modal_focus + Field::ALL.len() - 1) % Field::ALL.len();
    }

    /// Type a character into the focused field. Choice fields step forward on space.
    pub fn modal_input_char(&mut self, c: char) {
        let field = self.focused_field();
        if let Some(modal) = self.modal.as_mut() {
            if field.is_text() {
                modal.form_mut().push_char(field, c);
            } else if c == ' ' {
                modal.form_mut().cycle(field, true);
            }
        }
    }

    /// Delete the last character of the focused field.
    pub fn modal_backspace(&mut self) {
        let field = self.focused_field();
        if let Some(modal) = self.modal.as_mut() {
            modal.form_mut().pop_char(field);
        }
    }

    /// Step the focused choice field.
    pub fn modal_cycle(&mut self, forward: bool) {
        let field = self.focused_field();
        if let Some(modal) = self.modal.as_mut() {
            modal.form_mut().cycle(field, forward);
        }
    }

    /// Move selection up in the list.
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Move selection down in the list.
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.cars.len() {
            self.selected_index += 1;
        }
    }

    /// Start search mode.
    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
        self.search_query.clear();
        self.search_results.clear();
        self.search_selected_index = 0;
    }

    /// Exit search mode.
    pub fn exit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.search_query.clear();
        self.search_results.clear();
    }

    /// Perform fuzzy search over the loaded cars.
    pub fn perform_search(&mut self) {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        self.search_results.clear();

        if self.search_query.trim().is_empty() {
            return;
        }

        let matcher = SkimMatcherV2::default();

        let mut scored: Vec<_> = self
            .cars
            .cars()
            .iter()
            .filter_map(|car| {
                let search_text = format!(
                    "{} {} {}",
                    car.license_plate_number, car.manufacturer, car.model
                );
                matcher
                    .fuzzy_match(&search_text, &self.search_query)
                    .map(|score| SearchResult {
                        car: car.clone(),
                        score,
                    })
            })
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score));
        self.search_results = scored.into_iter().take(10).collect();
        self.search_selected_index = 0;
    }

    /// Select a search result.
    pub fn select_search_result(&mut self) {
        let Some(result) = self.search_results.get(self.search_selected_index) else {
            return;
        };

        if let Some(index) = self.cars.position(&result.car.license_plate_number) {
            self.selected_index = index;
        }
        self.exit_search();
    }
}
