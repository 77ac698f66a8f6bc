use ratatui::style::Color;

pub const COLORS: [Color; 12] = [
    Color::Rgb(0, 176, 80),
    Color::Rgb(128, 255, 0),
    Color::Rgb(255, 255, 0),
    Color::Rgb(255, 204, 0),
    Color::Rgb(255, 153, 0),
    Color::Rgb(255, 51, 0),
    Color::Rgb(255, 0, 0),
    Color::Rgb(153, 0, 255),
    Color::Rgb(102, 51, 255),
    Color::Rgb(0, 0, 255),
    Color::Rgb(0, 153, 255),
    Color::Rgb(0, 255, 255),
];

pub const TIME_SETTINGS: TimeSettings = TimeSettings {
    tick_ms: 1000,
    poll_ms: 100,
};

pub const FILE_PATHS: FilePaths = FilePaths {
    config: "config.txt",
    work_logs: "work_logs",
};

pub const LOG_FORMAT: LogFormat = LogFormat {
    file_prefix: "work_log_",
    header: ["Category", "TimeSpent(Minutes)"],
    date_key: "%Y%m%d",
    timestamp_key: "%Y%m%d_%H%M%S",
};

pub const CONFIG_KEYS: ConfigKeys = ConfigKeys {
    categories: "categories",
    display_minutes: "displayMinutes",
    autosave_on_exit: "autoSaveOnExit",
};

pub struct TimeSettings {
    pub tick_ms: u64,
    pub poll_ms: u64,
}

pub struct FilePaths {
    pub config: &'static str,
    pub work_logs: &'static str,
}

pub struct LogFormat {
    pub file_prefix: &'static str,
    pub header: [&'static str; 2],
    pub date_key: &'static str,
    pub timestamp_key: &'static str,
}

pub struct ConfigKeys {
    pub categories: &'static str,
    pub display_minutes: &'static str,
    pub autosave_on_exit: &'static str,
}
