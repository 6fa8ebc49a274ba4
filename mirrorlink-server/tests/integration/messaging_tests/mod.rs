mod test_peer_sends_binary_data;
mod test_peer_sends_message;
mod test_rapid_message_sending;
