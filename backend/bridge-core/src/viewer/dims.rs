/// Multi-dimensional navigation state: the current step along the slider
/// axis and how many steps exist. A plain 2-D scene has a single step.
#[derive(Debug, Clone, PartialEq)]
pub struct Dims {
    pub current_step: usize,
    pub nsteps: usize,
    pub axis_labels: Vec<String>,
}

impl Default for Dims {
    fn default() -> Self {
        Self {
            current_step: 0,
            nsteps: 1,
            axis_labels: vec![String::from("y"), String::from("x")],
        }
    }
}
