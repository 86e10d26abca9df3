//! RouteTrace Terminal Map Dashboard
//! =================================
//!
//! A presentation surface that draws the map in the terminal.
//! Uses Ratatui for rendering and Crossbeam to hand frames from the
//! animation driver to the UI thread.
//!
//! Enable with the `dashboard` feature flag.
//!
//! Features:
//! - World coastline canvas around the route
//! - Trail polyline in the configured route color
//! - Start / current / end markers
//! - Distance gauge and tile attribution

use std::io;
use std::time::Duration;

use crossbeam::channel::{Receiver, Sender};
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Map, MapResolution, Points},
        Block, Borders, Gauge, Paragraph,
    },
    Frame, Terminal,
};

use crate::coordinate::Coordinate;
use crate::error::TrackerError;
use crate::style::{Marker, MarkerKind, PanOptions, RouteStyle};
use crate::surface::{InitialView, PresentationSurface};

/// Smallest visible span in degrees on either axis.
const MIN_SPAN_DEG: f64 = 0.05;

// =============================================================================
// MAP FRAME (Sent from the driver to the dashboard)
// =============================================================================

/// Everything the dashboard needs to draw one frame.
#[derive(Debug, Clone)]
pub struct MapFrame {
    pub title: String,
    pub attribution: String,
    pub zoom: u8,
    /// Last pan target
    pub center: Coordinate,
    pub markers: Vec<Marker>,
    pub path: Vec<Coordinate>,
    pub route_rgba: [u8; 4],
    pub pans: u64,
}

impl Default for MapFrame {
    fn default() -> Self {
        Self {
            title: String::new(),
            attribution: String::new(),
            zoom: 0,
            center: Coordinate::new(0.0, 0.0),
            markers: Vec::new(),
            path: Vec::new(),
            route_rgba: [255, 255, 255, 255],
            pans: 0,
        }
    }
}

impl MapFrame {
    fn marker(&self, kind: MarkerKind) -> Option<&Marker> {
        self.markers.iter().find(|m| m.kind == kind)
    }

    /// Share of the start-to-end distance already covered, in [0, 1].
    pub fn fraction_travelled(&self) -> f64 {
        let (Some(start), Some(current), Some(end)) = (
            self.marker(MarkerKind::Start),
            self.marker(MarkerKind::Current),
            self.marker(MarkerKind::End),
        ) else {
            return 0.0;
        };
        let total = start.position.haversine_km(&end.position);
        if total <= f64::EPSILON {
            return 1.0;
        }
        (start.position.haversine_km(&current.position) / total).clamp(0.0, 1.0)
    }

    /// Canvas bounds `(x = lng, y = lat)` enclosing markers and trail with
    /// a 25% margin.
    pub fn view_bounds(&self) -> ([f64; 2], [f64; 2]) {
        let points = self
            .markers
            .iter()
            .map(|m| m.position)
            .chain(self.path.iter().copied())
            .chain(std::iter::once(self.center));

        let (mut min_lat, mut max_lat) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_lng, mut max_lng) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in points {
            min_lat = min_lat.min(p.lat);
            max_lat = max_lat.max(p.lat);
            min_lng = min_lng.min(p.lng);
            max_lng = max_lng.max(p.lng);
        }

        let pad = |lo: f64, hi: f64| {
            let span = (hi - lo).max(MIN_SPAN_DEG);
            let mid = (lo + hi) / 2.0;
            [mid - span * 0.75, mid + span * 0.75]
        };
        (pad(min_lng, max_lng), pad(min_lat, max_lat))
    }
}

// =============================================================================
// TERMINAL SURFACE
// =============================================================================

/// Presentation surface that publishes a [`MapFrame`] after every call.
pub struct TerminalSurface {
    tx: Sender<MapFrame>,
    frame: MapFrame,
}

/// Creates a connected surface / dashboard pair.
pub fn terminal_map() -> (TerminalSurface, MapDashboard) {
    let (tx, rx) = crossbeam::channel::unbounded();
    (TerminalSurface::new(tx), MapDashboard::new(rx))
}

impl TerminalSurface {
    pub fn new(tx: Sender<MapFrame>) -> Self {
        Self {
            tx,
            frame: MapFrame::default(),
        }
    }

    fn publish(&self) -> Result<(), TrackerError> {
        self.tx
            .send(self.frame.clone())
            .map_err(|_| TrackerError::surface("dashboard closed"))
    }
}

impl PresentationSurface for TerminalSurface {
    fn set_initial_view(&mut self, view: &InitialView) -> Result<(), TrackerError> {
        self.frame.title = view.title.clone();
        self.frame.attribution = view.tiles.attribution_text();
        self.frame.zoom = view.zoom;
        self.frame.center = view.center;
        self.publish()
    }

    fn pan_to(&mut self, center: Coordinate, _options: PanOptions) -> Result<(), TrackerError> {
        self.frame.center = center;
        self.frame.pans += 1;
        self.publish()
    }

    fn render_markers(&mut self, markers: &[Marker]) -> Result<(), TrackerError> {
        self.frame.markers = markers.to_vec();
        self.publish()
    }

    fn render_path(&mut self, path: &[Coordinate], style: &RouteStyle) -> Result<(), TrackerError> {
        self.frame.path = path.to_vec();
        self.frame.route_rgba = style.rgba()?;
        self.publish()
    }
}

// =============================================================================
// MAP DASHBOARD
// =============================================================================

/// TUI map view fed by a [`TerminalSurface`].
pub struct MapDashboard {
    rx: Receiver<MapFrame>,
    latest: MapFrame,
    frame_count: usize,
}

impl MapDashboard {
    /// Create a new dashboard with the frame receiver channel.
    pub fn new(rx: Receiver<MapFrame>) -> Self {
        Self {
            rx,
            latest: MapFrame::default(),
            frame_count: 0,
        }
    }

    /// Pulls every pending frame, keeping the newest. Returns how many.
    pub fn drain(&mut self) -> usize {
        let mut received = 0;
        while let Ok(frame) = self.rx.try_recv() {
            self.latest = frame;
            received += 1;
        }
        received
    }

    /// The most recent frame.
    pub fn latest(&self) -> &MapFrame {
        &self.latest
    }

    /// Run the TUI main loop (blocks until 'q' pressed)
    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        loop {
            self.drain();

            terminal.draw(|f| self.ui(f))?;
            self.frame_count += 1;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.code == KeyCode::Char('q') || key.code == KeyCode::Esc {
                        break;
                    }
                }
            }
        }

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn ui(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Map
                Constraint::Length(3), // Progress
                Constraint::Length(1), // Footer
            ])
            .split(f.area());

        let frame = &self.latest;

        // === HEADER ===
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("🧭 {}", frame.title),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  |  "),
            Span::styled(format!("{}", frame.center), Style::default().fg(Color::Cyan)),
            Span::raw("  |  "),
            Span::raw(format!("zoom {}  pans {}  frame {}", frame.zoom, frame.pans, self.frame_count)),
        ]))
        .block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(header, chunks[0]);

        // === MAP ===
        let (x_bounds, y_bounds) = frame.view_bounds();
        let [r, g, b, _] = frame.route_rgba;
        let route_color = Color::Rgb(r, g, b);

        let canvas = Canvas::default()
            .block(Block::default().title("Map").borders(Borders::ALL))
            .marker(symbols::Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                ctx.draw(&Map {
                    color: Color::DarkGray,
                    resolution: MapResolution::High,
                });
                ctx.layer();

                for pair in frame.path.windows(2) {
                    ctx.draw(&CanvasLine {
                        x1: pair[0].lng,
                        y1: pair[0].lat,
                        x2: pair[1].lng,
                        y2: pair[1].lat,
                        color: route_color,
                    });
                }
                ctx.layer();

                for marker in &frame.markers {
                    let [r, g, b] = marker.kind.rgb();
                    let coords = [(marker.position.lng, marker.position.lat)];
                    ctx.draw(&Points {
                        coords: &coords,
                        color: Color::Rgb(r, g, b),
                    });
                    if marker.kind != MarkerKind::Current {
                        ctx.print(
                            marker.position.lng,
                            marker.position.lat,
                            Span::styled(
                                format!(" {:?}", marker.kind),
                                Style::default().fg(Color::Rgb(r, g, b)),
                            ),
                        );
                    }
                }
            });
        f.render_widget(canvas, chunks[1]);

        // === PROGRESS ===
        let travelled = frame.fraction_travelled();
        let gauge = Gauge::default()
            .block(Block::default().title("Distance travelled").borders(Borders::ALL))
            .gauge_style(Style::default().fg(route_color))
            .percent((travelled * 100.0).round() as u16)
            .label(format!("{:.1}% | {} trail points", travelled * 100.0, frame.path.len()));
        f.render_widget(gauge, chunks[2]);

        // === FOOTER ===
        let footer = Paragraph::new(format!("{}  |  Press 'q' to quit", frame.attribution))
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(footer, chunks[3]);
    }
}

// =============================================================================
// TESTS
// =============================================================================
