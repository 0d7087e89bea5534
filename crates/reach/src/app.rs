//! Application context: owns the table, the map, the controls and the panel,
//! and routes control events to their registered handlers.

use crate::{
    condition::ConditionStatus,
    config::AppConfig,
    map::{LayerId, MapSurface, circle_bounds, rect_contains},
    reachability::{Coverage, Reachability},
    speed_table::SpeedTable,
    ui::{Control, ControlEvent, Controls, DisplayPanel},
};

pub type Handler<M> = fn(&mut ReachApp<M>);

/// Control -> handler registrations, run in registration order.
pub struct Subscriptions<M: MapSurface> {
    handlers: Vec<(Control, Handler<M>)>,
}

impl<M: MapSurface> Subscriptions<M> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn on(&mut self, control: Control, handler: Handler<M>) {
        self.handlers.push((control, handler));
    }

    pub fn handlers_for(&self, control: Control) -> Vec<Handler<M>> {
        self.handlers
            .iter()
            .filter(|(c, _)| *c == control)
            .map(|(_, handler)| *handler)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<M: MapSurface> Default for Subscriptions<M> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ReachApp<M: MapSurface> {
    config: AppConfig,
    table: SpeedTable,
    map: M,
    circle: Option<LayerId>,
    controls: Controls,
    panel: DisplayPanel,
    subscriptions: Subscriptions<M>,
}

impl<M: MapSurface> ReachApp<M> {
    /// Builds the context around an already loaded table, with no listeners.
    pub fn new(config: AppConfig, table: SpeedTable, map: M, controls: Controls) -> Self {
        Self {
            config,
            table,
            map,
            circle: None,
            controls,
            panel: DisplayPanel::default(),
            subscriptions: Subscriptions::new(),
        }
    }

    /// Two-phase startup: load the table (soft failure), then wire listeners.
    pub async fn start(config: AppConfig, map: M, controls: Controls) -> Self {
        let mut app = Self::new(config, SpeedTable::empty(), map, controls);
        app.init_map();

        let (table, notice) = SpeedTable::load_or_empty(&app.config.data_source).await;
        app.table = table;
        if let Some(notice) = notice {
            app.panel.notify(notice);
        }
        app.update_circle();

        app.register_listeners();
        app.update_condition_display();
        app
    }

    pub fn init_map(&mut self) {
        let station = &self.config.station;
        self.map.set_view(station.location, self.config.initial_zoom);
        self.map.add_marker(station.location, &station.label);
    }

    pub fn register_listeners(&mut self) {
        self.subscriptions.on(Control::Age, Self::update_circle);
        self.subscriptions.on(Control::Transport, Self::update_circle);
        self.subscriptions.on(Control::Duration, Self::update_circle);
        self.subscriptions.on(Control::Condition, Self::update_condition_display);
        self.subscriptions.on(Control::Condition, Self::update_circle);
        tracing::debug!(count = self.subscriptions.len(), "Registered listeners");
    }

    pub fn dispatch(&mut self, event: ControlEvent) {
        tracing::debug!(?event, "Control changed");
        self.controls.set(event);
        for handler in self.subscriptions.handlers_for(event.control()) {
            handler(self);
        }
    }

    /// Pure: reads the table and the current controls.
    pub fn recompute(&self) -> Reachability {
        Reachability::compute(
            &self.table,
            &self.controls.read(),
            self.config.station.location,
        )
    }

    pub fn apply(&mut self, reach: &Reachability) {
        if let Some(id) = self.circle.take() {
            self.map.remove_layer(id);
        }

        if let Coverage::Circle(circle) = &reach.coverage {
            self.circle = Some(self.map.add_circle(circle));

            let target = circle_bounds(circle);
            let visible = self
                .map
                .bounds()
                .is_some_and(|view| rect_contains(&view, &target));
            if !visible {
                self.map.fit_bounds(target, self.config.fit_padding_px);
            }
        }

        self.panel.values = reach.display();
    }

    pub fn update_circle(&mut self) {
        let reach = self.recompute();
        tracing::debug!(
            base_km = reach.base_distance_km,
            adjusted_km = reach.adjusted_distance_km,
            "Recomputed reachable area"
        );
        self.apply(&reach);
    }

    pub fn update_condition_display(&mut self) {
        self.panel.condition = Some(ConditionStatus::from_percent(self.controls.condition()));
    }

    pub fn panel(&self) -> &DisplayPanel {
        &self.panel
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn table(&self) -> &SpeedTable {
        &self.table
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn circle_layer(&self) -> Option<LayerId> {
        self.circle
    }

    pub fn subscriptions(&self) -> &Subscriptions<M> {
        &self.subscriptions
    }
}
