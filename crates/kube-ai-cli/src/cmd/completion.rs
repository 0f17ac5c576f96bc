use clap_complete::Shell;

/// Write a completion script for `shell` to stdout.
///
/// Load it with e.g. `source <(kube-ai completion bash)` or
/// `kube-ai completion fish | source`.
pub fn run(shell: Shell, mut command: clap::Command) -> anyhow::Result<()> {
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
