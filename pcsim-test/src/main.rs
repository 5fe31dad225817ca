use log::*;
use pcsim_core::{
    run_command, CapturedOutput, Computer, Disk, NoDelay, OperatingSystem, Ram, RecordingClock,
    Software,
};

/// A computer wired up so we can see everything it does without waiting for
/// any of it.
struct Bench {
    computer: Computer,
    output: CapturedOutput,
    ram_clock: RecordingClock,
    disk_clock: RecordingClock,
}

impl Bench {
    fn new(ram_size: u32, disk_size: u32, os_size: u32) -> Result<Bench, String> {
        let output = CapturedOutput::new();
        let ram_clock = RecordingClock::new();
        let disk_clock = RecordingClock::new();
        let mut computer = Computer::new();
        computer.set_ram(Ram::new("bench RAM", 1, ram_size, Box::new(ram_clock.clone())));
        computer.set_disk(Disk::new("bench disk", 100, disk_size, Box::new(disk_clock.clone())));
        let os = OperatingSystem::with_output("BenchOS", os_size, Box::new(output.clone()));
        if !computer.install_os(os) {
            return Err(format!("OS didn't install: {:?}", output.take()));
        }
        output.take();
        ram_clock.clear();
        disk_clock.clear();
        Ok(Bench {
            computer,
            output,
            ram_clock,
            disk_clock,
        })
    }
    fn ram(&self) -> &Ram {
        self.computer.get_ram().expect("bench always has RAM")
    }
    fn disk(&self) -> &Disk {
        self.computer.get_disk().expect("bench always has a disk")
    }
    fn ram_names(&self) -> Vec<String> {
        names(self.ram().get_resident())
    }
    fn run(&mut self, catalog: &[Software], command: &str) -> Option<bool> {
        let result = run_command(&mut self.computer, catalog, command);
        let (ram, disk) = (self.ram(), self.disk());
        debug!("{command} -> {result:?}, {ram:?}, {disk:?}");
        result
    }
    fn expect_output(&self, expected: &[&str]) -> Result<(), String> {
        expect_eq("output", self.output.take(), expected)
    }
}

fn names(software: &[Software]) -> Vec<String> {
    software.iter().map(|x| x.get_name().to_string()).collect()
}

fn expect_eq<A, B>(what: &str, actual: A, expected: B) -> Result<(), String>
where
    A: PartialEq<B> + std::fmt::Debug,
    B: std::fmt::Debug,
{
    if actual == expected {
        Ok(())
    } else {
        Err(format!("{what}: expected {expected:?}, got {actual:?}"))
    }
}

fn scenario_os_bootstrap() -> Result<(), String> {
    let output = CapturedOutput::new();
    let ram_clock = RecordingClock::new();
    let mut computer = Computer::new();
    computer.set_ram(Ram::new("bench RAM", 1, 2048, Box::new(ram_clock.clone())));
    computer.set_disk(Disk::new("bench disk", 100, 60000, Box::new(NoDelay)));
    let os = OperatingSystem::with_output("BenchOS", 1000, Box::new(output.clone()));
    expect_eq("install_os", computer.install_os(os), true)?;
    expect_eq(
        "output",
        output.take(),
        [
            "Loading setup for BenchOS into RAM",
            "Installing BenchOS into disk",
            "Successfully installed BenchOS",
        ],
    )?;
    let ram = computer.get_ram().ok_or("no RAM")?;
    let disk = computer.get_disk().ok_or("no disk")?;
    // Loaded once and never unloaded: it's running.
    expect_eq("RAM", names(ram.get_resident()), ["BenchOS"])?;
    expect_eq("RAM waits", ram_clock.get_waits(), vec![1000.0])?;
    expect_eq("disk", names(disk.get_resident()), ["BenchOS"])?;
    let name = computer.get_os().map(|x| x.get_name().to_string());
    expect_eq("OS", name, Some("BenchOS".to_string()))
}

fn scenario_small_install() -> Result<(), String> {
    let mut bench = Bench::new(2048, 60000, 1000)?;
    let catalog = [Software::new("editor", 100)];
    expect_eq("install", bench.run(&catalog, "install editor"), Some(true))?;
    bench.expect_output(&[
        "Loading setup for editor into RAM",
        "Installing editor into disk",
        "Successfully installed editor",
    ])?;
    // In and out of RAM at 1MHz, onto the disk at 100MB/s.
    expect_eq("RAM waits", bench.ram_clock.get_waits(), vec![100.0, 100.0])?;
    expect_eq("disk waits", bench.disk_clock.get_waits(), vec![1.0])?;
    expect_eq("RAM", bench.ram_names(), ["BenchOS"])
}

fn scenario_disk_too_small() -> Result<(), String> {
    let mut bench = Bench::new(2048, 500, 10)?;
    let before = bench.ram_names();
    let catalog = [Software::new("huge", 600)];
    expect_eq("install", bench.run(&catalog, "install huge"), Some(false))?;
    bench.expect_output(&[
        "Loading setup for huge into RAM",
        "Installing huge into disk",
        "Not enough space in disk to install huge",
    ])?;
    expect_eq("RAM", bench.ram_names(), before)?;
    expect_eq("disk", names(bench.disk().get_resident()), ["BenchOS"])
}

fn scenario_launch_missing() -> Result<(), String> {
    let mut bench = Bench::new(2048, 60000, 1000)?;
    let before = bench.ram_names();
    expect_eq("launch", bench.run(&[], "launch X"), Some(false))?;
    bench.expect_output(&[
        "Looking for an installation of X",
        "Could not find an installation named X",
    ])?;
    expect_eq("RAM", bench.ram_names(), before)?;
    expect_eq("RAM waits", bench.ram_clock.get_waits(), Vec::<f64>::new())?;
    expect_eq("disk waits", bench.disk_clock.get_waits(), vec![3.0])
}

fn scenario_exact_fit() -> Result<(), String> {
    // A zero-sized OS so the RAM is all ours.
    let mut bench = Bench::new(10, 60000, 0)?;
    let catalog = [Software::new("editor", 100)];
    expect_eq("install", bench.run(&catalog, "install editor"), Some(false))?;
    bench.expect_output(&[
        "Loading setup for editor into RAM",
        "Not enough RAM to install editor",
    ])?;
    expect_eq("RAM waits", bench.ram_clock.get_waits(), Vec::<f64>::new())
}

fn scenario_close_not_open() -> Result<(), String> {
    let mut bench = Bench::new(2048, 60000, 1000)?;
    let before = bench.ram_names();
    expect_eq("close", bench.run(&[], "close editor"), Some(false))?;
    bench.expect_output(&[
        "Attempting to close editor",
        "Failed to unload editor, was not open",
    ])?;
    expect_eq("RAM", bench.ram_names(), before)?;
    expect_eq("RAM waits", bench.ram_clock.get_waits(), vec![1.0])
}

fn scenario_uninstall_twice() -> Result<(), String> {
    let mut bench = Bench::new(2048, 60000, 1000)?;
    let catalog = [Software::new("editor", 100)];
    bench.run(&catalog, "install editor");
    bench.output.take();
    expect_eq("first", bench.run(&catalog, "uninstall editor"), Some(true))?;
    expect_eq("second", bench.run(&catalog, "uninstall editor"), Some(false))?;
    bench.expect_output(&[
        "Attempting to uninstall editor",
        "Successfully uninstalled editor",
        "Attempting to uninstall editor",
        "Failed to uninstall editor, installation not found",
    ])
}

fn scenario_install_then_launch() -> Result<(), String> {
    // 1000MB of OS leaves 100MB; the editor needs 60MB each time.
    let mut bench = Bench::new(200, 60000, 1000)?;
    let catalog = [Software::new("editor", 600)];
    expect_eq("install", bench.run(&catalog, "install editor"), Some(true))?;
    expect_eq("launch", bench.run(&catalog, "launch editor"), Some(true))?;
    expect_eq("RAM", bench.ram_names(), ["BenchOS", "editor"])?;
    // Running, so there isn't room to load the installer a second time.
    expect_eq("reinstall", bench.run(&catalog, "install editor"), Some(false))?;
    expect_eq("relaunch", bench.run(&catalog, "launch editor"), Some(false))?;
    bench.output.take();
    Ok(())
}

fn scenario_ignored_commands() -> Result<(), String> {
    let mut bench = Bench::new(2048, 60000, 1000)?;
    let catalog = [Software::new("editor", 100)];
    for command in ["install ghost", "format editor", "launch", ""] {
        expect_eq(command, bench.run(&catalog, command), None::<bool>)?;
    }
    bench.expect_output(&[])
}

fn scenario_capacity_never_exceeded() -> Result<(), String> {
    let mut bench = Bench::new(300, 5000, 500)?;
    let catalog: Vec<Software> = (1..=12)
        .map(|n| Software::new(format!("app{n}"), n * 150))
        .collect();
    for software in &catalog {
        let name = software.get_name();
        for verb in ["install", "launch", "launch", "close", "install", "launch"] {
            bench.run(&catalog, &format!("{verb} {name}"));
            for (what, used, capacity) in [
                ("RAM", bench.ram().used(), bench.ram().get_capacity()),
                ("disk", bench.disk().used(), bench.disk().get_capacity()),
            ] {
                if used > capacity as f64 {
                    return Err(format!("{what} holds {used}MB out of {capacity}MB"));
                }
            }
        }
    }
    bench.output.take();
    Ok(())
}

const SCENARIOS: &[(&str, fn() -> Result<(), String>)] = &[
    ("OS bootstrap stays in RAM", scenario_os_bootstrap),
    ("small install fits in RAM", scenario_small_install),
    ("disk too small rolls back RAM", scenario_disk_too_small),
    ("launching what isn't installed", scenario_launch_missing),
    ("exact fit is rejected", scenario_exact_fit),
    ("closing what isn't open", scenario_close_not_open),
    ("uninstalling twice", scenario_uninstall_twice),
    ("install then launch", scenario_install_then_launch),
    ("ignored commands", scenario_ignored_commands),
    ("capacity is never exceeded", scenario_capacity_never_exceeded),
];

fn main() {
    env_logger::init();
    let mut failures = 0;
    for (name, scenario) in SCENARIOS {
        match scenario() {
            Ok(()) => println!("PASS {name}"),
            Err(why) => {
                println!("FAIL {name}: {why}");
                failures += 1;
            }
        }
    }
    println!("{} scenarios, {failures} failed", SCENARIOS.len());
    if failures != 0 {
        std::process::exit(1);
    }
}
