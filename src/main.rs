fn main() -> std::process::ExitCode {
    arogya_lib::run()
}
