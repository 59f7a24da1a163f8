pub mod day_view;
pub mod form;
pub mod home_view;
pub mod month_view;
pub mod status_bar;
pub mod subject_list;
pub mod task_list;
pub mod timer_view;
pub mod upcoming_list;

pub use day_view::DayView;
pub use form::Form;
pub use home_view::HomeView;
pub use month_view::MonthView;
pub use status_bar::{NavBar, StatusBar};
pub use subject_list::SubjectList;
pub use task_list::TaskListView;
pub use timer_view::TimerView;
pub use upcoming_list::UpcomingList;
