/*
 *  func_timer.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Scope timer for per-frame processing cost
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::time::{Duration, Instant};
use log::{debug, trace};

/// Logs how long a scope took when it is dropped
pub struct FunctionTimer {
    name: &'static str,
    start: Instant,
    budget: Option<Duration>,
}

impl FunctionTimer {
    pub fn new(name: &'static str) -> Self {
        FunctionTimer {
            name,
            start: Instant::now(),
            budget: None,
        }
    }

    /// Same, but overruns of `budget` are raised to debug level
    pub fn with_budget(name: &'static str, budget: Duration) -> Self {
        FunctionTimer {
            budget: Some(budget),
            ..Self::new(name)
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn over_budget(&self) -> bool {
        self.budget.is_some_and(|b| self.elapsed() > b)
    }
}

impl Drop for FunctionTimer {
    fn drop(&mut self) {
        let took = self.start.elapsed();
        if self.over_budget() {
            debug!("'{}' took: {:?}, over budget", self.name, took);
        } else {
            trace!("'{}' took: {:?}", self.name, took);
        }
    }
}
