use std::fmt;

use crate::error::StartupError;

#[derive(Debug, Clone, PartialEq)]
pub struct Monitor {
    pub index: usize,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub is_primary: bool,
}

impl fmt::Display for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x{} at ({}, {}){}",
            self.name,
            self.width,
            self.height,
            self.x,
            self.y,
            if self.is_primary { " [primary]" } else { "" }
        )
    }
}

/// Picks the display to run on.
///
/// With an explicit index that monitor is used, or startup fails if it does not exist.
/// Otherwise the first non-primary monitor wins, falling back to the first one.
pub fn select_monitor(monitors: &[Monitor], index: Option<usize>) -> Result<&Monitor, StartupError> {
    if monitors.is_empty() {
        return Err(StartupError::NoMonitors);
    }

    match index {
        Some(index) => monitors.get(index).ok_or(StartupError::MonitorOutOfRange {
            index,
            count: monitors.len(),
        }),
        None => Ok(monitors
            .iter()
            .find(|m| !m.is_primary)
            .unwrap_or(&monitors[0])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(index: usize, is_primary: bool) -> Monitor {
        Monitor {
            index,
            name: format!("DP-{}", index),
            x: 1920 * index as i32,
            y: 0,
            width: 1920,
            height: 1080,
            is_primary,
        }
    }

    #[test]
    fn auto_selects_the_only_secondary() {
        let monitors = vec![monitor(0, true), monitor(1, false)];
        assert_eq!(select_monitor(&monitors, None).unwrap().index, 1);

        let monitors = vec![monitor(0, false), monitor(1, true), monitor(2, true)];
        assert_eq!(select_monitor(&monitors, None).unwrap().index, 0);
    }

    #[test]
    fn auto_selects_first_non_primary_among_several() {
        let monitors = vec![monitor(0, true), monitor(1, false), monitor(2, false)];
        assert_eq!(select_monitor(&monitors, None).unwrap().index, 1);
    }

    #[test]
    fn falls_back_to_first_when_all_primary() {
        let monitors = vec![monitor(0, true)];
        assert_eq!(select_monitor(&monitors, None).unwrap().index, 0);

        let monitors = vec![monitor(0, true), monitor(1, true)];
        assert_eq!(select_monitor(&monitors, None).unwrap().index, 0);
    }

    #[test]
    fn explicit_index_is_honoured_even_for_primary() {
        let monitors = vec![monitor(0, true), monitor(1, false)];
        assert_eq!(select_monitor(&monitors, Some(0)).unwrap().index, 0);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let monitors = vec![monitor(0, true), monitor(1, false)];
        match select_monitor(&monitors, Some(2)) {
            Err(StartupError::MonitorOutOfRange { index, count }) => {
                assert_eq!(index, 2);
                assert_eq!(count, 2);
            }
            other => panic!("unexpected selection: {:?}", other),
        }
    }

    #[test]
    fn empty_monitor_list_is_an_error() {
        assert!(matches!(select_monitor(&[], None), Err(StartupError::NoMonitors)));
        assert!(matches!(select_monitor(&[], Some(0)), Err(StartupError::NoMonitors)));
    }
}
