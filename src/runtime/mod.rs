mod runner;
mod shutdown;

use crate::periodic_tasks::{PeriodicTasksDeps, ReservationConfig};

pub(crate) struct RuntimeDeps {
    pub(crate) periodic_tasks_deps: PeriodicTasksDeps,
    pub(crate) reservation: ReservationConfig,
}

pub(crate) use runner::run;
