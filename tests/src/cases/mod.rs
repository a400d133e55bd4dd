cases! {
    udp_simple,
    udp_full_message,
    udp_levels,
    udp_custom_fields,
    udp_gelf_fields,
    udp_compression,
    udp_oversize,
    udp_shutdown,
    udp_exit_hook,
    log_compat
}
