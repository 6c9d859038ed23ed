// src/help.rs

/// Usage text shown for `/?` or when no batch file is given.
pub fn usage() -> String {
    format!(
        "silentcmd {version}

Runs a batch or script file without a console window, writing its output
to a log file and returning its exit code.

Usage:
  silentcmd [BatchFile [BatchArguments]] [Options]

Supported files:
  .bat .cmd   run directly
  .py         run with python from the search path
  .ps1        run with powershell (-file)

Options:
  /LOG:file      write output to file (overwrite)
  /LOG+:file     append output to file
  /DELAY:secs    wait before starting the batch file
  /?             show this help

Launcher flags (before BatchFile):
  --log-level LEVEL   error, warn, info, debug or trace
  --defaults PATH     TOML file with default options

Exit codes:
  0   help shown, or passed through from the batch file
  1   internal error
  2   no launcher found for the file type
  n   exit code of the batch file

Examples:
  silentcmd c:\\DoSomething.bat /LOG:c:\\MyLog.txt
  silentcmd nightly /DELAY:300 /LOG+:c:\\logs\\nightly.txt",
        version = env!("CARGO_PKG_VERSION")
    )
}

pub fn print_usage() {
    println!("{}", usage());
}
