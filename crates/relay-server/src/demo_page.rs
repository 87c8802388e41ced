//! Browser demo served at `/`.

use axum::response::Html;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Room Relay</title>
</head>
<body>
    <h1>Room Relay</h1>
    <form id="form">
        <input type="text" id="room" placeholder="Room" autocomplete="off"/>
        <input type="text" id="text" placeholder="Message" autocomplete="off"/>
        <button>Send</button>
    </form>
    <ul id="messages"></ul>
    <script>
        var ws = null;
        var joined = null;

        function connect(room) {
            var scheme = location.protocol === "https:" ? "wss://" : "ws://";
            ws = new WebSocket(scheme + location.host + "/ws/" + encodeURIComponent(room));
            joined = room;
            ws.onmessage = function (event) {
                var item = document.createElement("li");
                item.appendChild(document.createTextNode(event.data));
                document.getElementById("messages").appendChild(item);
            };
            return new Promise(function (resolve) { ws.onopen = resolve; });
        }

        document.getElementById("form").onsubmit = async function (event) {
            event.preventDefault();
            var room = document.getElementById("room").value;
            var input = document.getElementById("text");
            if (!room) {
                return;
            }
            if (!ws || ws.readyState === WebSocket.CLOSED || joined !== room) {
                if (ws) {
                    ws.close();
                }
                await connect(room);
            }
            ws.send(input.value);
            input.value = "";
        };
    </script>
</body>
</html>
"#;

pub async fn index() -> Html<&'static str> {
    Html(PAGE)
}
