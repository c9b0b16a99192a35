//! The interactive drill-down: state -> site list -> nearby places.
//!
//! Navigation is a small state machine. [`transition`] is pure: it maps the
//! current state and one line of input to the next state plus an [`Effect`]
//! for the driver to carry out. [`Session`] owns the I/O: it runs effects
//! against a [`SiteDirectory`] and a [`NearbySearch`] and renders results.

use std::io::{self, BufRead, Write};
use std::mem;

use crate::api::{NearbyPlacesClient, PlaceFact};
use crate::catalog::SiteCatalog;
use crate::error::Result;
use crate::fetch::HttpGet;
use crate::scraper::StateIndex;
use crate::site::Site;

pub const STATE_PROMPT: &str = r#"Enter a state name(e.g. Michigan, michigan) or "exit": "#;
pub const SITE_PROMPT: &str = r#"Choose the number for detail search or "exit" or "back": "#;

const EXIT: &str = "exit";
const BACK: &str = "back";

/// Source of the state index and per-state site lists.
pub trait SiteDirectory {
    fn state_index(&mut self) -> Result<StateIndex>;
    fn sites_for_state(&mut self, state_url: &str) -> Result<Vec<Site>>;
}

/// Source of places near a site.
pub trait NearbySearch {
    fn find_nearby(&self, site: &Site) -> Result<Vec<PlaceFact>>;
}

impl<H: HttpGet> SiteDirectory for SiteCatalog<H> {
    fn state_index(&mut self) -> Result<StateIndex> {
        self.build_state_index()
    }

    fn sites_for_state(&mut self, state_url: &str) -> Result<Vec<Site>> {
        self.list_sites_for_state(state_url)
    }
}

impl<H: HttpGet> NearbySearch for NearbyPlacesClient<H> {
    fn find_nearby(&self, site: &Site) -> Result<Vec<PlaceFact>> {
        NearbyPlacesClient::find_nearby(self, site)
    }
}

/// The numbered site list for one state. Entries are keyed `"1"..="N"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteCursor {
    state_name: String,
    sites: Vec<Site>,
}

impl SiteCursor {
    pub fn new(state_name: impl Into<String>, sites: Vec<Site>) -> Self {
        Self {
            state_name: state_name.into(),
            sites,
        }
    }

    pub fn state_name(&self) -> &str {
        &self.state_name
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Looks up a site by its displayed number. Only the exact decimal form
    /// matches, so `"01"` or `"+1"` do not.
    pub fn get(&self, key: &str) -> Option<&Site> {
        let index = key.parse::<usize>().ok().filter(|n| n.to_string() == key)?;
        index.checked_sub(1).and_then(|i| self.sites.get(i))
    }

    pub fn entries(&self) -> impl Iterator<Item = (usize, &Site)> {
        self.sites.iter().enumerate().map(|(i, site)| (i + 1, site))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    StateSelect,
    SiteList(SiteCursor),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Enter proper state name")]
    UnknownState,

    #[error("Invalid input")]
    InvalidSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Resolve this lower-cased state name and, if known, list its sites.
    LookupState(String),
    ShowNearby(Site),
    Report(InputError),
}

/// Applies one line of user input. Input is trimmed and matched case-insensitively.
pub fn transition(state: SessionState, input: &str) -> (SessionState, Effect) {
    let input = input.trim().to_lowercase();
    match state {
        SessionState::Exit => (SessionState::Exit, Effect::None),
        _ if input == EXIT => (SessionState::Exit, Effect::None),
        SessionState::StateSelect if input.is_empty() => {
            (SessionState::StateSelect, Effect::Report(InputError::UnknownState))
        }
        SessionState::StateSelect => (SessionState::StateSelect, Effect::LookupState(input)),
        SessionState::SiteList(_) if input == BACK => (SessionState::StateSelect, Effect::None),
        SessionState::SiteList(cursor) => {
            let effect = match cursor.get(&input) {
                Some(site) => Effect::ShowNearby(site.clone()),
                None => Effect::Report(InputError::InvalidSelection),
            };
            (SessionState::SiteList(cursor), effect)
        }
    }
}

fn separator(width: usize) -> String {
    "-".repeat(width)
}

pub fn render_site_list<W: Write>(out: &mut W, cursor: &SiteCursor) -> io::Result<()> {
    let line = separator(26 + cursor.state_name().chars().count());
    writeln!(out, "{}", line)?;
    writeln!(out, "List of national sites in {}", cursor.state_name())?;
    writeln!(out, "{}", line)?;
    for (index, site) in cursor.entries() {
        writeln!(out, "[{}] {}", index, site)?;
    }
    Ok(())
}

pub fn render_places<W: Write>(out: &mut W, site: &Site, places: &[PlaceFact]) -> io::Result<()> {
    let line = separator(12 + site.name().chars().count());
    writeln!(out, "{}", line)?;
    writeln!(out, "Places near {}", site.name())?;
    writeln!(out, "{}", line)?;
    for place in places {
        writeln!(out, "- {}", place)?;
    }
    Ok(())
}

/// REPL driver. Failures while fetching or parsing are printed and the loop
/// carries on; only I/O errors on the terminal end it.
pub struct Session<D, N> {
    directory: D,
    nearby: N,
    state: SessionState,
}

impl<D: SiteDirectory, N: NearbySearch> Session<D, N> {
    pub fn new(directory: D, nearby: N) -> Self {
        Self {
            directory,
            nearby,
            state: SessionState::StateSelect,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Exit
    }

    /// Prompts and reads until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> io::Result<()> {
        let mut buf = Vec::new();
        while !self.is_finished() {
            match &self.state {
                SessionState::SiteList(_) => write!(out, "\n{}", SITE_PROMPT)?,
                _ => write!(out, "{}", STATE_PROMPT)?,
            }
            out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                self.state = SessionState::Exit;
                break;
            }
            match std::str::from_utf8(&buf) {
                Ok(line) => self.handle(line, &mut out)?,
                Err(_) => self.reject_input(&mut out)?,
            }
        }
        out.flush()
    }

    /// Applies one line of input and performs the resulting effect.
    pub fn handle<W: Write>(&mut self, input: &str, out: &mut W) -> io::Result<()> {
        let current = mem::replace(&mut self.state, SessionState::StateSelect);
        let (next, effect) = transition(current, input);
        self.state = next;

        match effect {
            Effect::None => Ok(()),
            Effect::Report(err) => writeln!(out, "[Error] {}", err),
            Effect::LookupState(name) => self.open_state(&name, out),
            Effect::ShowNearby(site) => match self.nearby.find_nearby(&site) {
                Ok(places) => render_places(out, &site, &places),
                Err(e) => writeln!(out, "[Error] {}", e),
            },
        }
    }

    /// Reports a line that could not be read as text, as the current prompt
    /// would report any other unusable answer.
    fn reject_input<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let err = match self.state {
            SessionState::SiteList(_) => InputError::InvalidSelection,
            _ => InputError::UnknownState,
        };
        writeln!(out, "[Error] {}", err)
    }

    fn open_state<W: Write>(&mut self, name: &str, out: &mut W) -> io::Result<()> {
        let index = match self.directory.state_index() {
            Ok(index) => index,
            Err(e) => return writeln!(out, "[Error] {}", e),
        };
        let Some(state_url) = index.get(name) else {
            return writeln!(out, "[Error] {}", InputError::UnknownState);
        };
        match self.directory.sites_for_state(state_url) {
            Ok(sites) => {
                let cursor = SiteCursor::new(name, sites);
                render_site_list(out, &cursor)?;
                self.state = SessionState::SiteList(cursor);
                Ok(())
            }
            Err(e) => writeln!(out, "[Error] {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::cell::Cell;
    use std::io::Cursor;

    fn site(name: &str, category: &str, postal_code: &str) -> Site {
        Site::from_parts(name, category, Some("Houghton"), Some("MI"), Some(postal_code), None).unwrap()
    }

    fn michigan() -> SiteCursor {
        SiteCursor::new(
            "michigan",
            vec![
                site("Isle Royale", "National Park", "49931"),
                site("Keweenaw", "", "49913"),
            ],
        )
    }

    #[derive(Default)]
    struct FakeDirectory {
        index_calls: usize,
        listed: Vec<String>,
        fail_listing: bool,
    }

    impl SiteDirectory for FakeDirectory {
        fn state_index(&mut self) -> Result<StateIndex> {
            self.index_calls += 1;
            let mut index = StateIndex::new();
            index.insert("michigan".to_string(), "https://www.nps.gov/state/mi/index.htm".to_string());
            Ok(index)
        }

        fn sites_for_state(&mut self, state_url: &str) -> Result<Vec<Site>> {
            self.listed.push(state_url.to_string());
            if self.fail_listing {
                return Err(AppError::ParseError("missing park list".to_string()));
            }
            Ok(vec![site("Isle Royale", "National Park", "49931")])
        }
    }

    #[derive(Default)]
    struct FakeNearby {
        calls: Cell<usize>,
    }

    impl NearbySearch for FakeNearby {
        fn find_nearby(&self, _site: &Site) -> Result<Vec<PlaceFact>> {
            self.calls.set(self.calls.get() + 1);
            Ok(vec![PlaceFact {
                name: "Copper Kettle".to_string(),
                category: "Restaurants".to_string(),
                address: "1 Main St".to_string(),
                city: "Houghton".to_string(),
            }])
        }
    }

    fn run_session(lines: &str) -> (Session<FakeDirectory, FakeNearby>, String) {
        let mut session = Session::new(FakeDirectory::default(), FakeNearby::default());
        let mut out = Vec::new();
        session.run(Cursor::new(lines.to_string()), &mut out).unwrap();
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_exit_from_state_select() {
        let (next, effect) = transition(SessionState::StateSelect, "EXIT\n");
        assert_eq!(next, SessionState::Exit);
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn test_exit_from_site_list() {
        let (next, _) = transition(SessionState::SiteList(michigan()), "exit");
        assert_eq!(next, SessionState::Exit);
    }

    #[test]
    fn test_state_name_is_lowercased_for_lookup() {
        let (next, effect) = transition(SessionState::StateSelect, "  Michigan \n");
        assert_eq!(next, SessionState::StateSelect);
        assert_eq!(effect, Effect::LookupState("michigan".to_string()));
    }

    #[test]
    fn test_blank_state_name_reports_error() {
        let (next, effect) = transition(SessionState::StateSelect, "\n");
        assert_eq!(next, SessionState::StateSelect);
        assert_eq!(effect, Effect::Report(InputError::UnknownState));
    }

    #[test]
    fn test_back_returns_to_state_select() {
        let (next, effect) = transition(SessionState::SiteList(michigan()), "Back");
        assert_eq!(next, SessionState::StateSelect);
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn test_valid_index_keeps_cursor_and_shows_nearby() {
        let (next, effect) = transition(SessionState::SiteList(michigan()), "2");
        assert_eq!(next, SessionState::SiteList(michigan()));
        assert_eq!(effect, Effect::ShowNearby(site("Keweenaw", "", "49913")));
    }

    #[test]
    fn test_invalid_selections_leave_state_unchanged() {
        for input in ["0", "3", "01", "+1", "-1", "one", ""] {
            let (next, effect) = transition(SessionState::SiteList(michigan()), input);
            assert_eq!(next, SessionState::SiteList(michigan()), "input {:?}", input);
            assert_eq!(effect, Effect::Report(InputError::InvalidSelection), "input {:?}", input);
        }
    }

    #[test]
    fn test_render_site_list_format() {
        let mut out = Vec::new();
        render_site_list(&mut out, &michigan()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "-".repeat(34));
        assert_eq!(lines[1], "List of national sites in michigan");
        assert_eq!(lines[3], "[1] Isle Royale (National Park): Houghton, MI 49931");
        assert_eq!(lines[4], "[2] Keweenaw (no category): Houghton, MI 49913");
    }

    #[test]
    fn test_exit_at_first_prompt_does_no_io() {
        let (session, output) = run_session("exit\n");

        assert!(session.is_finished());
        assert_eq!(session.directory.index_calls, 0);
        assert_eq!(output, STATE_PROMPT);
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let (session, _) = run_session("");
        assert!(session.is_finished());
    }

    #[test]
    fn test_non_utf8_line_is_reported_and_session_continues() {
        let mut bytes = vec![0xff, 0xfe, b'\n'];
        bytes.extend_from_slice(b"michigan\n");
        bytes.extend_from_slice(&[0xc3, 0x28, b'\n']);
        bytes.extend_from_slice(b"exit\n");

        let mut session = Session::new(FakeDirectory::default(), FakeNearby::default());
        let mut out = Vec::new();
        session.run(Cursor::new(bytes), &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(session.is_finished());
        assert_eq!(session.directory.index_calls, 1);
        assert_eq!(session.nearby.calls.get(), 0);
        assert!(output.contains("[Error] Enter proper state name\n"));
        assert!(output.contains("[Error] Invalid input\n"));
    }

    #[test]
    fn test_unknown_state_stays_in_state_select() {
        let mut session = Session::new(FakeDirectory::default(), FakeNearby::default());
        let mut out = Vec::new();

        session.handle("atlantis", &mut out).unwrap();

        assert_eq!(session.state(), &SessionState::StateSelect);
        assert!(session.directory.listed.is_empty());
        assert_eq!(String::from_utf8(out).unwrap(), "[Error] Enter proper state name\n");
    }

    #[test]
    fn test_drill_down_then_back() {
        let (session, output) = run_session("michigan\n1\nback\nexit\n");

        assert!(session.is_finished());
        assert_eq!(session.directory.index_calls, 1);
        assert_eq!(session.nearby.calls.get(), 1);
        assert!(output.contains("[1] Isle Royale (National Park): Houghton, MI 49931\n"));
        assert!(output.contains("Places near Isle Royale\n"));
        assert!(output.contains("- Copper Kettle (Restaurants): 1 Main St, Houghton\n"));
        assert_eq!(output.matches(SITE_PROMPT).count(), 2);
        assert_eq!(output.matches(STATE_PROMPT).count(), 2);
    }

    #[test]
    fn test_back_discards_the_cursor() {
        let mut session = Session::new(FakeDirectory::default(), FakeNearby::default());
        let mut out = Vec::new();

        session.handle("michigan", &mut out).unwrap();
        assert!(matches!(session.state(), SessionState::SiteList(c) if c.len() == 1));
        session.handle("1", &mut out).unwrap();
        session.handle("1", &mut out).unwrap();
        assert!(matches!(session.state(), SessionState::SiteList(_)));
        session.handle("back", &mut out).unwrap();

        assert_eq!(session.state(), &SessionState::StateSelect);
        assert_eq!(session.nearby.calls.get(), 2);
    }

    #[test]
    fn test_listing_failure_is_reported_and_session_continues() {
        let directory = FakeDirectory {
            fail_listing: true,
            ..FakeDirectory::default()
        };
        let mut session = Session::new(directory, FakeNearby::default());
        let mut out = Vec::new();

        session.handle("michigan", &mut out).unwrap();

        assert_eq!(session.state(), &SessionState::StateSelect);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("[Error] Unparsable page"));
    }
}
