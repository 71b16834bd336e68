use builddeps_lib::deps::DEPENDENCIES;
use builddeps_lib::platform::Platform;

use crate::output::print_stat;

pub fn cmd_info() {
  println!("System:");
  match Platform::current() {
    Some(platform) => print_stat("Platform", &platform.to_string()),
    None => println!("Could not detect platform."),
  }

  println!();
  println!("Dependencies:");
  for dep in DEPENDENCIES {
    let source = dep.source();
    print_stat(dep.name(), &format!("{} ({})", source.version, source.url));
  }
}
