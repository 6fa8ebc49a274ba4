mod test_records_appended;
mod test_shipping_layer_delivers;
