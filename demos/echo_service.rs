use service_forge::{Program, ProgramResult, Service, ServiceConfig};
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::info;

/// Logs a line every few seconds until stopped.
struct Echo {
    stop: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Program for Echo {
    fn start(&self, service: &dyn Service) -> ProgramResult {
        info!("[Echo] {} started. PID: {}", service, std::process::id());

        let stop = Arc::clone(&self.stop);
        let handle = thread::spawn(move || {
            let mut i = 0u64;
            // Short sleeps so the stop flag is noticed quickly
            while !stop.load(Ordering::Relaxed) {
                if i % 30 == 0 {
                    info!("[Echo] Ping #{}", i / 30);
                }
                i += 1;
                thread::sleep(Duration::from_millis(100));
            }
        });
        *self.worker.lock().map_err(|_| "worker lock poisoned")? = Some(handle);
        Ok(())
    }

    fn stop(&self, service: &dyn Service) -> ProgramResult {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.worker.lock().map_err(|_| "worker lock poisoned")?.take() {
            handle.join().map_err(|_| "worker thread panicked")?;
        }
        info!("[Echo] {} stopped cleanly.", service);
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let action = env::args().nth(1).unwrap_or_else(|| "run".to_owned());

    let config = ServiceConfig::new("echo_service")
        .display_name("Echo Service")
        .description("Logs a heartbeat line every three seconds.")
        .arg("run");

    let program = Echo {
        stop: Arc::new(AtomicBool::new(false)),
        worker: Mutex::new(None),
    };
    let service = service_forge::new_service(program, config)?;

    let logger = service.logger(None)?;
    log::set_boxed_logger(logger)?;
    log::set_max_level(log::LevelFilter::Info);

    match action.as_str() {
        "install" => service.install()?,
        "uninstall" => service.uninstall()?,
        "start" => service.start()?,
        "stop" => service.stop()?,
        "restart" => service.restart()?,
        "run" => service.run()?,
        other => {
            eprintln!("usage: echo_service [install|uninstall|start|stop|restart|run], got '{}'", other);
            std::process::exit(2);
        }
    }

    Ok(())
}
